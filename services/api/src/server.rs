use crate::cli::ServeArgs;
use crate::infra::{seed_demo_owners, AppState, InMemoryOwnerRepository};
use crate::routes::with_interview_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use interview_desk::config::AppConfig;
use interview_desk::error::AppError;
use interview_desk::telemetry;
use interview_desk::workflows::interviews::{InterviewDeskService, MemorySlotStore};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemorySlotStore::new());
    let owners = Arc::new(InMemoryOwnerRepository::default());
    if args.seed_demo {
        seed_demo_owners(&owners);
    }
    let desk = Arc::new(InterviewDeskService::new(store, owners));

    let app = with_interview_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "interview desk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
