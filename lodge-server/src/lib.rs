//! Lodge Server - 酒店客房预订后端
//!
//! # 架构概述
//!
//! 本模块是 Lodge Server 的主入口，提供以下核心功能：
//!
//! - **预订引擎** (`booking`): 纯函数的重叠检测与定价 + 每房间锁
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系，member/admin 角色门禁
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! lodge-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色门禁
//! ├── booking/       # 预订引擎 (重叠/定价/锁)
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use booking::{BookingError, RoomLocks, StayRange};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置环境 (dotenv, 日志)
///
/// 必须在读取配置之前调用
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __              __
   / /   ____  ____/ /___ ____
  / /   / __ \/ __  / __ `/ _ \
 / /___/ /_/ / /_/ / /_/ /  __/
/_____/\____/\__,_/\__, /\___/
                  /____/
    "#
    );
}
