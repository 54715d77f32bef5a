use crate::cli::ServeArgs;
use crate::infra::{company_state, open_repository, AppState};
use crate::routes::with_company_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cs_hub::config::AppConfig;
use cs_hub::error::AppError;
use cs_hub::telemetry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = open_repository(&config).await?;
    let app = with_company_routes(company_state(&config, repository))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_rows = config.import.max_rows,
        max_bytes = config.import.max_bytes,
        "customer success hub ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
