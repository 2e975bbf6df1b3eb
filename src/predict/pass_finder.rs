use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::propagation::look_angles;
use crate::predict::types::{Pass, SatelliteInfo};
use crate::predict::GroundStation;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ELEVATION: f64 = 0.0;

/// Pass being accumulated while the satellite is above the horizon.
struct OpenPass {
    aos: DateTime<Utc>,
    aos_azimuth_deg: f64,
    max_elevation_deg: f64,
    tca: DateTime<Utc>,
}

impl OpenPass {
    /// Moves TCA from the coarse grid onto the actual elevation maximum.
    fn refine_peak(
        &mut self,
        station: &GroundStation,
        elements: &Elements,
        constants: &Constants,
        los: DateTime<Utc>,
    ) -> Result<(), PredictError> {
        let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
        let low = (self.tca - coarse_step).max(self.aos);
        let high = (self.tca + coarse_step).min(los);
        let (tca, elevation) = find_peak(station, elements, constants, low, high)?;
        if elevation > self.max_elevation_deg {
            self.tca = tca;
            self.max_elevation_deg = elevation;
        }
        Ok(())
    }

    fn close(
        self,
        satellite: &SatelliteInfo,
        los: DateTime<Utc>,
        los_azimuth_deg: f64,
    ) -> Pass {
        Pass {
            satellite: satellite.name.clone(),
            norad_id: satellite.norad_id,
            aos: self.aos,
            los,
            tca: self.tca,
            max_elevation_deg: round2(self.max_elevation_deg),
            aos_azimuth_deg: round2(self.aos_azimuth_deg),
            los_azimuth_deg: round2(los_azimuth_deg),
            duration_seconds: (los - self.aos).num_seconds(),
        }
    }
}

/// Find all passes for a satellite within a time range
pub fn predict_passes(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    satellite: &SatelliteInfo,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_elevation: f64,
) -> Result<Vec<Pass>, PredictError> {
    let mut passes = Vec::new();
    let mut cursor = start;
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut open: Option<OpenPass> = None;

    while cursor <= end {
        let sample = look_angles(station, elements, constants, cursor)?;
        let visible = sample.elevation_deg >= HORIZON_ELEVATION;

        if visible {
            if let Some(current) = open.as_mut() {
                if sample.elevation_deg > current.max_elevation_deg {
                    current.max_elevation_deg = sample.elevation_deg;
                    current.tca = cursor;
                }
            } else {
                let (aos, aos_azimuth_deg) = if cursor == start {
                    // already up when the window opens
                    (cursor, sample.azimuth_deg)
                } else {
                    refine_crossing(station, elements, constants, cursor - coarse_step, cursor, true)?
                };
                open = Some(OpenPass {
                    aos,
                    aos_azimuth_deg,
                    max_elevation_deg: sample.elevation_deg,
                    tca: cursor,
                });
            }
        } else if let Some(mut current) = open.take() {
            let (los, los_azimuth_deg) =
                refine_crossing(station, elements, constants, cursor - coarse_step, cursor, false)?;
            current.refine_peak(station, elements, constants, los)?;
            if current.max_elevation_deg >= min_elevation {
                passes.push(current.close(satellite, los, los_azimuth_deg));
            }
        }

        cursor += coarse_step;
    }

    // Handle pass in progress at end of window
    if let Some(mut current) = open.take() {
        current.refine_peak(station, elements, constants, end)?;
        if current.max_elevation_deg >= min_elevation {
            let sample = look_angles(station, elements, constants, end)?;
            passes.push(current.close(satellite, end, sample.azimuth_deg));
        }
    }

    Ok(passes)
}

/// Binary search to find exact horizon crossing time
fn refine_crossing(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
) -> Result<(DateTime<Utc>, f64), PredictError> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let sample = look_angles(station, elements, constants, mid)?;

        let above = sample.elevation_deg >= HORIZON_ELEVATION;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    let final_sample = look_angles(station, elements, constants, high)?;
    Ok((high, final_sample.azimuth_deg))
}

/// Ternary search for the elevation maximum between `low` and `high`.
///
/// Elevation is unimodal over a single pass, so this narrows to
/// `FINE_STEP_SECONDS` without sampling every second.
fn find_peak(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    mut low: DateTime<Utc>,
    mut high: DateTime<Utc>,
) -> Result<(DateTime<Utc>, f64), PredictError> {
    let fine_step = Duration::seconds(FINE_STEP_SECONDS);

    while high - low > fine_step {
        let third = (high - low) / 3;
        let left = look_angles(station, elements, constants, low + third)?;
        let right = look_angles(station, elements, constants, high - third)?;
        if left.elevation_deg < right.elevation_deg {
            low += third;
        } else {
            high -= third;
        }
    }

    let peak = low + (high - low) / 2;
    let sample = look_angles(station, elements, constants, peak)?;
    Ok((peak, sample.elevation_deg))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::test_support::iss_entry;

    fn station() -> GroundStation {
        GroundStation::from_coordinates("45.0, 7.0", Some(250.0)).unwrap()
    }

    #[test]
    fn finds_ordered_passes_within_a_day() {
        let entry = iss_entry();
        let start = entry.elements.datetime.and_utc();
        let end = start + Duration::hours(24);

        let passes = predict_passes(
            &station(),
            &entry.elements,
            &entry.constants,
            &entry.info,
            start,
            end,
            0.0,
        )
        .unwrap();

        assert!(!passes.is_empty());
        for pass in &passes {
            assert!(pass.aos <= pass.tca && pass.tca <= pass.los);
            assert!(pass.aos >= start && pass.los <= end);
            assert!(pass.max_elevation_deg >= 0.0);
            assert_eq!(pass.norad_id, 25544);
        }
        for pair in passes.windows(2) {
            assert!(pair[0].los <= pair[1].aos);
        }
    }

    fn day_of_passes(start: DateTime<Utc>) -> Vec<Pass> {
        let entry = iss_entry();
        predict_passes(
            &station(),
            &entry.elements,
            &entry.constants,
            &entry.info,
            start,
            start + Duration::hours(24),
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn tca_sits_on_the_elevation_maximum() {
        let entry = iss_entry();
        let elevation = |t: DateTime<Utc>| {
            look_angles(&station(), &entry.elements, &entry.constants, t)
                .unwrap()
                .elevation_deg
        };
        let margin = Duration::seconds(5);

        let passes = day_of_passes(entry.elements.datetime.and_utc());
        let interior: Vec<_> = passes
            .iter()
            .filter(|p| p.tca - p.aos > margin && p.los - p.tca > margin)
            .collect();
        assert!(!interior.is_empty());
        for pass in interior {
            let peak = elevation(pass.tca);
            assert!(peak >= elevation(pass.tca - margin), "{:?}", pass);
            assert!(peak >= elevation(pass.tca + margin), "{:?}", pass);
            assert!((round2(peak) - pass.max_elevation_deg).abs() < 0.02);
        }
    }

    #[test]
    fn window_opening_mid_pass_starts_the_pass_at_the_window() {
        let entry = iss_entry();
        let passes = day_of_passes(entry.elements.datetime.and_utc());
        let longest = passes
            .iter()
            .filter(|p| p.tca - p.aos > Duration::seconds(120))
            .max_by_key(|p| p.duration_seconds)
            .expect("a pass rising well before its peak");

        let start = longest.aos + Duration::seconds(60);
        let resumed = predict_passes(
            &station(),
            &entry.elements,
            &entry.constants,
            &entry.info,
            start,
            start + Duration::hours(1),
            0.0,
        )
        .unwrap();

        let first = resumed.first().expect("satellite is up at the window start");
        assert_eq!(first.aos, start);
        assert!(first.tca > start);
        assert!((first.tca - longest.tca).num_seconds().abs() <= 3);
        assert!((first.los - longest.los).num_seconds().abs() <= 2);
    }

    #[test]
    fn minimum_elevation_filters_low_passes() {
        let entry = iss_entry();
        let start = entry.elements.datetime.and_utc();
        let end = start + Duration::hours(24);

        let all = predict_passes(
            &station(),
            &entry.elements,
            &entry.constants,
            &entry.info,
            start,
            end,
            0.0,
        )
        .unwrap();
        let high = predict_passes(
            &station(),
            &entry.elements,
            &entry.constants,
            &entry.info,
            start,
            end,
            30.0,
        )
        .unwrap();

        assert!(high.len() <= all.len());
        assert!(high.iter().all(|p| p.max_elevation_deg >= 30.0));
    }
}
