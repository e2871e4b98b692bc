//! 个人资料的 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    extract::AppJson,
    middleware::AppState,
    models::user::*,
    repository::UserRepository,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 获取个人资料
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(auth_context.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ProfileResponse::from(user)))
}

/// 更新个人资料
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .update_profile(auth_context.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": ProfileResponse::from(user)
    })))
}
