//! 学生端 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{roster::*, user::Role},
    repository::RosterRepository,
};
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

/// 学生本人档案
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<StudentProfile>, AppError> {
    auth_context.require_role(&[Role::Student])?;

    let repo = RosterRepository::new(state.db.clone());
    let profile = repo
        .student_profile(auth_context.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(profile))
}

/// 搜索同学
pub async fn search(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<StudentSearchQuery>,
) -> Result<Json<Vec<StudentProfile>>, AppError> {
    auth_context.require_role(&[Role::Student])?;

    let repo = RosterRepository::new(state.db.clone());
    Ok(Json(repo.search_students(&query).await?))
}
