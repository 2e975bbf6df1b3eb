use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::predictor::PassPredictor;
use crate::predict::slot::PassSlot;
use crate::predict::types::PassEvent;

const RETRY_AFTER_FAILURE: Duration = Duration::seconds(60);
const MIN_DELAY: Duration = Duration::seconds(1);

#[derive(Debug, Clone, Copy)]
pub struct PredictionSchedule {
    /// Upper bound between two predictions.
    pub repredict_interval: Duration,
    /// How long the elapsed state stays on screen before re-predicting.
    pub pass_linger: Duration,
}

/// When the next prediction is due after a successful run.
pub fn next_run_at(
    event: Option<&PassEvent>,
    now: DateTime<Utc>,
    schedule: &PredictionSchedule,
) -> DateTime<Utc> {
    let periodic = later(now, schedule.repredict_interval);
    let due = match event {
        Some(event) => later(event.pass_time, schedule.pass_linger).min(periodic),
        None => periodic,
    };
    due.max(later(now, MIN_DELAY))
}

fn later(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    t.checked_add_signed(d).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Keeps a [`PassSlot`] populated by calling the predictor on a blocking thread.
pub struct PredictionTask {
    predictor: Arc<dyn PassPredictor>,
    slot: PassSlot,
    schedule: PredictionSchedule,
}

impl PredictionTask {
    pub fn new(
        predictor: Arc<dyn PassPredictor>,
        slot: PassSlot,
        schedule: PredictionSchedule,
    ) -> Self {
        Self {
            predictor,
            slot,
            schedule,
        }
    }

    /// Run one prediction cycle and return when the next one is due.
    pub async fn run_once(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let predictor = self.predictor.clone();
        let result = tokio::task::spawn_blocking(move || predictor.next_pass(now))
            .await
            .map_err(|e| PredictError::Worker(e.to_string()))
            .and_then(|r| r);

        match result {
            Ok(Some(event)) => {
                log::info!(
                    "Next pass of {} (NORAD {}) at {}",
                    event.satellite_id,
                    event.norad_id,
                    event.pass_time
                );
                let next = next_run_at(Some(&event), now, &self.schedule);
                self.slot.set(Some(event));
                next
            }
            Ok(None) => {
                log::warn!("No pass found within the search horizon");
                self.slot.set(None);
                next_run_at(None, now, &self.schedule)
            }
            Err(e) => {
                log::warn!("Pass prediction failed: {}", e);
                if let Some(stale) = self.slot.get() {
                    let over = stale
                        .pass_time
                        .checked_add_signed(self.schedule.pass_linger)
                        .is_some_and(|end| end <= now);
                    if over {
                        log::warn!(
                            "Dropping prediction for {} at {}: pass is over",
                            stale.satellite_id,
                            stale.pass_time
                        );
                        self.slot.set(None);
                    }
                }
                now + RETRY_AFTER_FAILURE
            }
        }
    }

    pub async fn run(self) {
        loop {
            let next = self.run_once(Utc::now()).await;
            let delay = (next - Utc::now()).to_std().unwrap_or_default();
            log::debug!("Next prediction at {}", next);
            tokio::time::sleep(delay).await;
        }
    }
}
