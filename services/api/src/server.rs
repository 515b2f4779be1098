use crate::cli::ServeArgs;
use crate::infra::{read_response, AppState, HttpSession};
use crate::routes::with_result_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use resume_screen::config::AppConfig;
use resume_screen::error::AppError;
use resume_screen::evaluation::HttpEvaluationClient;
use resume_screen::telemetry;
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

    let client = Arc::new(HttpEvaluationClient::new(&config.backend)?);
    let session = match args.seed.take() {
        Some(path) => {
            let response = read_response(&path).await?;
            info!(job_id = %response.job_id, path = %path.display(), "session seeded");
            HttpSession::with_response(client, response)
        }
        None => HttpSession::new(client),
    };

    let app = with_result_routes(Arc::new(session))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        backend = %config.backend.evaluate_url(),
        "resume screening console ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
