use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::countdown::RefreshLoop;
use crate::predict::{PassPredictor, PassSlot, PredictionSchedule, PredictionTask};

use super::api::countdown as countdown_handlers;
use super::api::pass as pass_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub fn router(state: AppState) -> Router {
    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // Countdown API endpoints
        .route("/api/countdown", get(countdown_handlers::countdown))
        .route("/api/pass", get(pass_handlers::next_pass))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: Config,
    predictor: Arc<dyn PassPredictor>,
    schedule: PredictionSchedule,
) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    // Bind first so a taken port fails before any background work starts
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    let pass = PassSlot::new();
    let (refresh, countdown) = RefreshLoop::new(pass.clone(), config.web.refresh_interval);

    let state = AppState {
        config: Arc::new(config),
        pass: pass.clone(),
        countdown,
    };

    tokio::spawn(PredictionTask::new(predictor, pass, schedule).run());
    tokio::spawn(refresh.run());

    log::info!("Starting server on {}", bind_addr);

    axum::serve(listener, router(state)).await
}
