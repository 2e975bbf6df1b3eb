use axum::{extract::State, Json};

use crate::predict::PassEvent;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/pass",
    tag = "countdown",
    responses(
        (status = 200, description = "Predicted next pass", body = PassEvent),
        (status = 404, description = "No prediction available yet", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn next_pass(State(state): State<AppState>) -> ApiResult<Json<PassEvent>> {
    state
        .pass
        .get()
        .map(Json)
        .ok_or(ApiError::NotFound("no_prediction"))
}
