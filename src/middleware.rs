//! HTTP 中间件与应用状态
//! 请求追踪、请求 ID 与指标

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{PasswordHasher, TokenService},
    config::AppConfig,
    error::AppError,
    repository::UserRepository,
    services::{CredentialService, CredentialStore},
    telemetry,
};

/// 应用状态
///
/// 所有字段在启动后不可变，跨请求共享
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: sqlx::PgPool,
    pub token_service: Arc<TokenService>,
    pub credential_service: Arc<CredentialService>,
    pub password_hasher: PasswordHasher,
}

impl AppState {
    /// 使用 PostgreSQL 凭证存储构建状态
    pub fn new(config: AppConfig, db: sqlx::PgPool) -> Result<Self, AppError> {
        let store: Arc<dyn CredentialStore> = Arc::new(UserRepository::new(db.clone()));
        Self::with_store(config, db, store)
    }

    /// 使用任意凭证存储构建状态
    pub fn with_store(
        config: AppConfig,
        db: sqlx::PgPool,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, AppError> {
        let token_service = Arc::new(TokenService::from_config(&config)?);
        let credential_service = Arc::new(CredentialService::new(
            store,
            token_service.clone(),
            Arc::new(config.clone()),
        )?);
        let password_hasher = PasswordHasher::from_config(&config)?;

        Ok(Self {
            config,
            db,
            token_service,
            credential_service,
            password_hasher,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            telemetry::HTTP_REQUESTS_TOTAL,
            "method" => method.as_str().to_owned(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!(telemetry::HTTP_REQUEST_DURATION).record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 在响应头中回显 trace_id / request_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
