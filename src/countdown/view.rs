use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

use super::types::CountdownState;
use crate::predict::PassEvent;

pub const PENDING_TEXT: &str = "Awaiting pass prediction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// No prediction available yet.
    Pending,
    Counting,
    Elapsed,
}

/// What the dashboard shows after a refresh tick.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CountdownView {
    pub phase: Phase,
    pub display: String,
    pub satellite: Option<String>,
    pub norad_id: Option<u32>,
    pub pass_time: Option<DateTime<Utc>>,
    pub seconds_remaining: Option<u64>,
    pub max_elevation_deg: Option<f64>,
}

impl CountdownView {
    pub fn pending() -> Self {
        Self {
            phase: Phase::Pending,
            display: PENDING_TEXT.to_string(),
            satellite: None,
            norad_id: None,
            pass_time: None,
            seconds_remaining: None,
            max_elevation_deg: None,
        }
    }

    /// Render the view for `pass` at `now`.
    pub fn render(pass: Option<&PassEvent>, now: DateTime<Utc>) -> Self {
        let Some(pass) = pass else {
            return Self::pending();
        };

        let state = CountdownState::compute(pass.pass_time, now);
        let phase = if state.is_elapsed() {
            Phase::Elapsed
        } else {
            Phase::Counting
        };

        Self {
            phase,
            display: state.countdown().to_string(),
            satellite: Some(pass.satellite_id.clone()),
            norad_id: Some(pass.norad_id),
            pass_time: Some(pass.pass_time),
            seconds_remaining: Some(state.seconds_remaining),
            max_elevation_deg: pass.max_elevation_deg,
        }
    }
}

impl Default for CountdownView {
    fn default() -> Self {
        Self::pending()
    }
}
