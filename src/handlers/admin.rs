//! 管理员 HTTP 处理器
//! 学生、教师、科目的增删改查以及统计

use crate::{
    auth::{AuthContext, PasswordHasher},
    error::AppError,
    extract::AppJson,
    middleware::AppState,
    models::{roster::*, subject::*, user::Role},
    repository::{RosterRepository, SubjectRepository},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

fn require_admin(auth_context: &AuthContext) -> Result<(), AppError> {
    auth_context.require_role(&[Role::Admin])
}

async fn create_member(
    state: &AppState,
    kind: RosterKind,
    req: CreateMemberRequest,
) -> Result<i64, AppError> {
    req.validate()?;
    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    let password_hash = state.password_hasher.hash_async(req.password.clone()).await?;
    let repo = RosterRepository::new(state.db.clone());
    repo.create(kind, &req, &password_hash).await
}

async fn update_member(
    state: &AppState,
    kind: RosterKind,
    id: i64,
    req: UpdateMemberRequest,
) -> Result<(), AppError> {
    req.validate()?;

    let repo = RosterRepository::new(state.db.clone());
    if !repo.update(kind, id, &req).await? {
        return Err(AppError::NotFound);
    }
    Ok(())
}

async fn delete_member(state: &AppState, kind: RosterKind, id: i64) -> Result<(), AppError> {
    let repo = RosterRepository::new(state.db.clone());
    if !repo.delete(kind, id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = id, role = %kind.role(), "Roster member deleted");
    Ok(())
}

// ==================== 学生 ====================

/// 创建学生
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    AppJson(req): AppJson<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    let id = create_member(&state, RosterKind::Student, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student created successfully", "id": id })),
    ))
}

/// 学生列表
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<Vec<MemberRow>>, AppError> {
    require_admin(&auth_context)?;

    let repo = RosterRepository::new(state.db.clone());
    Ok(Json(repo.list(RosterKind::Student).await?))
}

/// 更新学生
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    update_member(&state, RosterKind::Student, id, req).await?;

    Ok(Json(json!({ "message": "Student updated successfully" })))
}

/// 删除学生
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    delete_member(&state, RosterKind::Student, id).await?;

    Ok(Json(json!({ "message": "Student deleted successfully" })))
}

// ==================== 教师 ====================

/// 创建教师
pub async fn create_faculty(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    AppJson(req): AppJson<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    let id = create_member(&state, RosterKind::Faculty, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Faculty created successfully", "id": id })),
    ))
}

/// 教师列表
pub async fn list_faculty(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<Vec<MemberRow>>, AppError> {
    require_admin(&auth_context)?;

    let repo = RosterRepository::new(state.db.clone());
    Ok(Json(repo.list(RosterKind::Faculty).await?))
}

/// 更新教师
pub async fn update_faculty(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    update_member(&state, RosterKind::Faculty, id, req).await?;

    Ok(Json(json!({ "message": "Faculty updated successfully" })))
}

/// 删除教师
pub async fn delete_faculty(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    delete_member(&state, RosterKind::Faculty, id).await?;

    Ok(Json(json!({ "message": "Faculty deleted successfully" })))
}

// ==================== 统计与搜索 ====================

/// 学生与教师人数
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<RosterCounts>, AppError> {
    require_admin(&auth_context)?;

    let repo = RosterRepository::new(state.db.clone());
    Ok(Json(repo.counts().await?))
}

/// 按姓名搜索学生和教师
pub async fn search(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<MemberSearchQuery>,
) -> Result<Json<MemberSearchResponse>, AppError> {
    require_admin(&auth_context)?;

    let repo = RosterRepository::new(state.db.clone());
    let term = query.query.as_deref();
    let students = repo.search(RosterKind::Student, term).await?;
    let faculty = repo.search(RosterKind::Faculty, term).await?;

    Ok(Json(MemberSearchResponse { students, faculty }))
}

// ==================== 科目 ====================

/// 创建科目
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    AppJson(req): AppJson<SubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;
    req.validate()?;

    let repo = SubjectRepository::new(state.db.clone());
    let subject = repo.create(&req).await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// 科目列表
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<Json<Vec<Subject>>, AppError> {
    require_admin(&auth_context)?;

    let repo = SubjectRepository::new(state.db.clone());
    Ok(Json(repo.list().await?))
}

/// 更新科目
pub async fn update_subject(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
    AppJson(req): AppJson<SubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    require_admin(&auth_context)?;
    req.validate()?;

    let repo = SubjectRepository::new(state.db.clone());
    let subject = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    Ok(Json(subject))
}

/// 删除科目
pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_context)?;

    let repo = SubjectRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "Subject deleted successfully" })))
}
