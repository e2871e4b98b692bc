//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{config::ServerConfig, handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // 需要令牌的路由，角色在各处理器中校验
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_current_user))
        .route("/api/auth/dashboard", get(handlers::auth::enrollment_dashboard))
        .route(
            "/api/user/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        // 学生
        .route("/api/student/profile", get(handlers::student::get_profile))
        .route("/api/student/search", get(handlers::student::search))
        // 教师
        .route("/api/faculty/class-list", get(handlers::faculty::class_list))
        // 管理员
        .route(
            "/api/admin/students",
            get(handlers::admin::list_students).post(handlers::admin::create_student),
        )
        .route(
            "/api/admin/students/{id}",
            put(handlers::admin::update_student).delete(handlers::admin::delete_student),
        )
        .route(
            "/api/admin/faculty",
            get(handlers::admin::list_faculty).post(handlers::admin::create_faculty),
        )
        .route(
            "/api/admin/faculty/{id}",
            put(handlers::admin::update_faculty).delete(handlers::admin::delete_faculty),
        )
        .route(
            "/api/admin/subjects",
            get(handlers::admin::list_subjects).post(handlers::admin::create_subject),
        )
        .route(
            "/api/admin/subjects/{id}",
            put(handlers::admin::update_subject).delete(handlers::admin::delete_subject),
        )
        .route("/api/admin/dashboard", get(handlers::admin::dashboard))
        .route("/api/admin/search", get(handlers::admin::search))
        .layer(axum::middleware::from_fn_with_state(
            state.token_service.clone(),
            crate::auth::jwt_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(RequestBodyLimitLayer::new(state.config.server.body_limit_bytes))
        .layer(cors_layer(&state.config.server))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 根据配置构建 CORS 层，未配置来源时允许任意来源
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let Some(origins) = &config.cors_allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
