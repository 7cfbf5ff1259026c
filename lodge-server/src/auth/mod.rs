//! 认证模块
//!
//! JWT + Argon2 认证体系：
//! - [`jwt`] - 令牌生成与验证
//! - [`middleware`] - 路由级认证与管理员门禁
//! - [`extractor`] - CurrentUser 提取器

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
