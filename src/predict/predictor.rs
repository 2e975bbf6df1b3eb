use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::pass_finder::predict_passes;
use crate::predict::tle_loader::{TleEntry, TleSource};
use crate::predict::types::PassEvent;
use crate::predict::GroundStation;

/// Produces the next overhead pass for the tracked satellite.
///
/// Implementations may block (file or network IO, propagation); callers run
/// them off the async runtime.
pub trait PassPredictor: Send + Sync {
    /// `Ok(None)` means no pass within the predictor's search horizon.
    fn next_pass(&self, now: DateTime<Utc>) -> Result<Option<PassEvent>, PredictError>;
}

struct CachedTle {
    entry: Arc<TleEntry>,
    loaded_at: DateTime<Utc>,
}

/// SGP4-backed predictor for a single satellite over a fixed ground station.
pub struct SgpPredictor {
    pub source: TleSource,
    pub norad_id: u32,
    pub station: GroundStation,
    pub min_elevation_deg: f64,
    pub search_horizon: Duration,
    /// Elements younger than this are reused instead of reloaded.
    pub tle_max_age: Duration,
    cache: Mutex<Option<CachedTle>>,
}

impl SgpPredictor {
    pub fn new(
        source: TleSource,
        norad_id: u32,
        station: GroundStation,
        min_elevation_deg: f64,
        search_horizon: Duration,
        tle_max_age: Duration,
    ) -> Self {
        Self {
            source,
            norad_id,
            station,
            min_elevation_deg,
            search_horizon,
            tle_max_age,
            cache: Mutex::new(None),
        }
    }

    /// Cached elements while fresh, else a reload from the source.
    ///
    /// A failed reload falls back to the cached set, however old.
    fn elements(&self, now: DateTime<Utc>) -> Result<Arc<TleEntry>, PredictError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref() {
            if now - cached.loaded_at < self.tle_max_age {
                return Ok(cached.entry.clone());
            }
        }

        match self.source.load(self.norad_id) {
            Ok(entry) => {
                log::debug!(
                    "Loaded TLE for {} (epoch {}) from {}",
                    entry.info.name,
                    entry.elements.datetime,
                    entry.info.tle_source
                );
                let entry = Arc::new(entry);
                *cache = Some(CachedTle {
                    entry: entry.clone(),
                    loaded_at: now,
                });
                Ok(entry)
            }
            Err(e) => match cache.as_ref() {
                Some(cached) => {
                    log::warn!(
                        "TLE reload failed ({}), reusing elements loaded at {}",
                        e,
                        cached.loaded_at
                    );
                    Ok(cached.entry.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Next pass for an already loaded element set.
    pub fn next_pass_for(
        &self,
        entry: &TleEntry,
        now: DateTime<Utc>,
    ) -> Result<Option<PassEvent>, PredictError> {
        let end = now.checked_add_signed(self.search_horizon).ok_or_else(|| {
            PredictError::Propagation(format!(
                "search horizon of {} overflows from {}",
                self.search_horizon, now
            ))
        })?;
        let passes = predict_passes(
            &self.station,
            &entry.elements,
            &entry.constants,
            &entry.info,
            now,
            end,
            self.min_elevation_deg,
        )?;

        let next = passes.iter().find(|pass| pass.tca > now);
        if let Some(pass) = next {
            log::debug!(
                "{} pass: AOS {} (az {:.0}°), TCA {} (el {:.1}°), LOS {} (az {:.0}°), {} s",
                pass.satellite,
                pass.aos,
                pass.aos_azimuth_deg,
                pass.tca,
                pass.max_elevation_deg,
                pass.los,
                pass.los_azimuth_deg,
                pass.duration_seconds
            );
        }
        Ok(next.map(PassEvent::from))
    }
}

impl PassPredictor for SgpPredictor {
    fn next_pass(&self, now: DateTime<Utc>) -> Result<Option<PassEvent>, PredictError> {
        let entry = self.elements(now)?;
        self.next_pass_for(&entry, now)
    }
}
