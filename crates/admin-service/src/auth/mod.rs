//! 认证模块
//!
//! JWT Token 管理和密码哈希

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtManager};
pub use password::{hash_password, verify_password};
