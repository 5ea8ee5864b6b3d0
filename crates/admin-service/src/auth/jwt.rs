//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "adima-admin-secret-key-change-in-production".to_string(),
            expires_in_secs: 86400, // 24 小时
            issuer: "adima-admin-service".to_string(),
        }
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 管理员 ID
    pub sub: String,
    /// 管理员邮箱
    pub email: String,
    /// 角色
    pub role: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    /// 从 sub 字段解析管理员 ID
    pub fn admin_id(&self) -> Result<i64, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Internal("invalid admin id in token".to_string()))
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// 创建 JWT 管理器
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token，返回 (token, 过期时间戳)
    pub fn generate_token(
        &self,
        admin_id: i64,
        email: &str,
        role: &str,
    ) -> Result<(String, i64), ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expires_in_secs);

        let claims = Claims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    ///
    /// Token 无效或过期时统一返回 Unauthorized
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let manager = JwtManager::new(JwtConfig::default());

        let (token, exp) = manager
            .generate_token(1, "admin@adima.com", "admin")
            .unwrap();
        assert!(exp > Utc::now().timestamp());

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "admin@adima.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.admin_id().unwrap(), 1);
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(JwtConfig::default());

        let result = manager.verify_token("invalid.token.here");
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let manager = JwtManager::new(JwtConfig::default());
        let other = JwtManager::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            ..JwtConfig::default()
        });

        let (token, _) = other.generate_token(1, "admin@adima.com", "admin").unwrap();
        assert!(matches!(
            manager.verify_token(&token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let manager = JwtManager::new(JwtConfig::default());
        let other = JwtManager::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..JwtConfig::default()
        });

        let (token, _) = other.generate_token(1, "admin@adima.com", "admin").unwrap();
        assert!(matches!(
            manager.verify_token(&token),
            Err(ApiError::Unauthorized)
        ));
    }
}
