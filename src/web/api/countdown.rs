use axum::{extract::State, Json};

use crate::countdown::CountdownView;
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/countdown",
    tag = "countdown",
    responses(
        (status = 200, description = "Countdown as of the last refresh tick", body = CountdownView)
    )
)]
pub async fn countdown(State(state): State<AppState>) -> Json<CountdownView> {
    Json(state.current_view())
}
