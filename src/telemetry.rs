//! 日志与指标
//! 初始化结构化日志，并登记请求指标的说明

use crate::config::AppConfig;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// 请求计数器名称
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
/// 请求耗时直方图名称
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的日志级别。重复初始化时返回错误而不是 panic。
pub fn init_telemetry(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        // 生产环境
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        // 开发环境
        _ => tracing_subscriber::fmt::layer().pretty().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// 登记指标说明
/// metrics 0.24 在首次使用时创建指标，这里只补充描述信息
pub fn init_metrics() {
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests by method and status");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_gauge!("db.pool.size", "Open database connections");
    metrics::describe_gauge!("db.pool.idle", "Idle database connections");

    tracing::debug!("Metrics described");
}
