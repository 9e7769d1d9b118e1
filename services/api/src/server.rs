use crate::cli::ServeArgs;
use crate::commands::build_discovery;
use crate::infra::{AppState, InMemoryProfileStore, LoggingDispatcher};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tender_sift::config::AppConfig;
use tender_sift::error::AppError;
use tender_sift::telemetry;
use tender_sift::workflows::qualification::{QualificationService, ScoringConfig};
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

    let profiles = match args.profiles.take() {
        Some(path) => InMemoryProfileStore::load(&path)?,
        None => InMemoryProfileStore::default(),
    };
    info!(profiles = profiles.len(), "capability profiles loaded");

    let service = Arc::new(QualificationService::new(
        build_discovery(&config)?,
        Arc::new(profiles),
        Arc::new(LoggingDispatcher::default()),
        ScoringConfig::default(),
    ));

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        jurisdictions = config.source.jurisdictions.len(),
        "tender qualification service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
