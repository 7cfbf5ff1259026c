//! User API Handlers
//!
//! Member profile self-service plus admin user management.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::ValidateEmail;

use crate::api::auth::handler::UserInfo;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserRole, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_USERNAME_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult, Paged, Pagination};

// =============================================================================
// Member Handlers
// =============================================================================

/// PUT /api/member/profile - 更新个人资料 (字段级局部更新)
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    validate_optional_text(&payload.username, "username", MAX_USERNAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    if let Some(ref email) = payload.email
        && !email.validate_email()
    {
        return Err(AppError::validation(format!("Invalid email: {}", email)));
    }

    let repo = UserRepository::new(state.get_db());
    let updated = repo.update(&user.id, payload).await?;

    tracing::info!(user = %user.id, "Profile updated");

    Ok(Json(UserInfo::from(updated)))
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// GET /api/admin/users - 用户列表
pub async fn list(
    State(state): State<ServerState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paged<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo
        .find_all(pagination.limit(), pagination.start())
        .await?;
    let items = users.into_iter().map(UserInfo::from).collect();
    Ok(Json(Paged::new(items, &pagination)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// PUT /api/admin/users/{id}/role - 修改用户角色
pub async fn update_role(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserInfo>> {
    // Demoting yourself would lock the last admin out mid-session
    if admin.id == id && payload.role != UserRole::Admin {
        return Err(AppError::business_rule("You cannot demote your own account"));
    }

    let repo = UserRepository::new(state.get_db());
    let updated = repo.update_role(&id, payload.role).await?;

    tracing::info!(
        user = %id,
        role = %payload.role.as_str(),
        changed_by = %admin.id,
        "User role updated"
    );

    Ok(Json(UserInfo::from(updated)))
}

/// DELETE /api/admin/users/{id} - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if admin.id == id {
        return Err(AppError::business_rule("You cannot delete your own account"));
    }

    let repo = UserRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(user = %id, deleted_by = %admin.id, "User deleted");

    Ok(Json(true))
}
