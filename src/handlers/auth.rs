//! 认证相关的 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    extract::AppJson,
    middleware::AppState,
    models::{auth::*, enrollment::EnrollmentDashboard},
    repository::EnrollmentRepository,
    services::AuthOutcome,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

fn auth_response(outcome: AuthOutcome, message: &str) -> AuthResponse {
    AuthResponse {
        token: outcome.token,
        user: outcome.user,
        message: message.to_string(),
    }
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.credential_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(auth_response(outcome, "User registered successfully")),
    ))
}

/// 登录
///
/// 未知用户与密码错误对外返回同一个 401，避免探测用户名
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .credential_service
        .login(req)
        .await
        .map_err(|e| match e {
            AppError::NotFound => AppError::InvalidCredential,
            other => other,
        })?;

    Ok(Json(auth_response(outcome, "User logged in successfully")))
}

/// 获取当前用户信息
pub async fn get_current_user(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "id": auth_context.user_id,
        "username": auth_context.username,
        "role": auth_context.role,
    })))
}

/// 各课程选课人数
pub async fn enrollment_dashboard(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<Json<EnrollmentDashboard>, AppError> {
    let repo = EnrollmentRepository::new(state.db.clone());
    let dashboard = repo.counts_by_course().await?.into_iter().collect();

    Ok(Json(dashboard))
}
