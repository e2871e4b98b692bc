//! 教师端 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{enrollment::ClassListEntry, user::Role},
    repository::EnrollmentRepository,
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// 教师的学生名单，没有任何学生时返回 404
pub async fn class_list(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<Vec<ClassListEntry>>, AppError> {
    auth_context.require_role(&[Role::Faculty])?;

    let repo = EnrollmentRepository::new(state.db.clone());
    let entries = repo.class_list(auth_context.user_id).await?;

    if entries.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(entries))
}
