use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placemint::config::AppConfig;
use placemint::error::AppError;
use placemint::pipeline::{InMemoryJobStore, PipelineService};
use placemint::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryJobStore::new());
    let pipeline_service = Arc::new(PipelineService::new(store));

    let app = with_pipeline_routes(pipeline_service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.server)?)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placemint api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
