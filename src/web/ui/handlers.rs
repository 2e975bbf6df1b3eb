use axum::{extract::State, response::IntoResponse};

use crate::web::state::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let refresh_ms = u64::try_from(state.config.web.refresh_interval.as_millis()).unwrap_or(u64::MAX);
    DashboardTemplate::new(
        &state.current_view(),
        state.config.station_label(),
        refresh_ms,
    )
}
