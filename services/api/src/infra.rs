use axum::http::{HeaderValue, Method};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use placemint::config::ServerConfig;
use placemint::error::AppError;
use placemint::pipeline::{lifecycle::parse_deadline, OWNER_HEADER};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts the same formats as job deadlines, e.g. `2026-10-16` or an RFC 3339 timestamp.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    match parse_deadline(raw) {
        Ok(Some(timestamp)) => Ok(timestamp),
        Ok(None) => Err("timestamp must not be empty".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

pub(crate) fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, AppError> {
    let origin = match config.cors_origin.as_deref() {
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|_| AppError::Input(format!("invalid CORS origin '{origin}'")))?;
            AllowOrigin::exact(value)
        }
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static(OWNER_HEADER),
        ]))
}
