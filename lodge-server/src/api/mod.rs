//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册/登录/当前用户
//! - [`rooms`] - 房源浏览、可用性搜索、管理
//! - [`bookings`] - 预订创建、取消、管理
//! - [`reviews`] - 住后评价
//! - [`payments`] - 支付记录与结算
//! - [`users`] - 个人资料与用户管理
//! - [`upload`] - 房源图片上传与读取

pub mod auth;
pub mod bookings;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod rooms;
pub mod upload;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResult, Paged, Pagination};
