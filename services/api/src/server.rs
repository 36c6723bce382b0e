use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_wizard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_wizard::config::AppConfig;
use credit_wizard::error::AppError;
use credit_wizard::telemetry;
use credit_wizard::workflows::scoring::MockCreditScorer;
use credit_wizard::workflows::wizard::WizardService;
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

    let wizard_service = Arc::new(WizardService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockCreditScorer),
        config.intake,
    )
    .with_idle_timeout(config.session.idle_timeout()));

    let app = with_wizard_routes(wizard_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        minimum_bank_statements = config.intake.minimum_bank_statements,
        session_idle_minutes = config.session.idle_minutes,
        "credit wizard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
