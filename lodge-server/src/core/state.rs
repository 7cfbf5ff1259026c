use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::booking::RoomLocks;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{UserCreate, UserRole};
use crate::db::repository::UserRepository;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是请求处理的核心数据结构。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | room_locks | Arc<RoomLocks> | 每房间预订锁 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 每房间预订锁 (串行化重叠检查与写入)
    pub room_locks: Arc<RoomLocks>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
            room_locks: Arc::new(RoomLocks::new()),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database)
    /// 3. JWT 服务
    /// 4. 初始管理员 (若配置了 ADMIN_PASSWORD)
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");

        // 2. Initialize services
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.db, jwt_service);

        // 3. Seed the initial admin account
        state.ensure_admin().await;

        state
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 创建初始管理员账户 (幂等)
    ///
    /// 只有在 ADMIN_PASSWORD 已配置且该用户名不存在时才会创建。
    async fn ensure_admin(&self) {
        let Some(password) = self.config.admin_password.clone() else {
            return;
        };

        let repo = UserRepository::new(self.get_db());
        match repo.find_by_username(&self.config.admin_username).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let result = repo
                    .create(UserCreate {
                        username: self.config.admin_username.clone(),
                        email: format!("{}@localhost", self.config.admin_username),
                        password,
                        full_name: Some("Administrator".to_string()),
                        role: UserRole::Admin,
                    })
                    .await;
                match result {
                    Ok(_) => {
                        tracing::info!(
                            username = %self.config.admin_username,
                            "Initial admin account created"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create initial admin account");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to check for initial admin account");
            }
        }
    }
}
