use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState, InMemoryArtifactStore};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use competency_eval::config::AppConfig;
use competency_eval::error::AppError;
use competency_eval::telemetry;
use competency_eval::workflows::competency::EvaluationDesk;
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

    let directory = Arc::new(load_directory(&config.evaluation, None)?);
    let store = Arc::new(InMemoryArtifactStore::default());
    let desk = Arc::new(EvaluationDesk::new(directory, store));

    let app = with_evaluation_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "competency evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
