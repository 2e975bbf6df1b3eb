use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Information about a single satellite from TLE
#[derive(Debug, Clone)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

/// Topocentric direction of the satellite at one instant.
#[derive(Debug, Clone, Copy)]
pub struct LookAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// A predicted satellite pass
#[derive(Debug, Clone)]
pub struct Pass {
    pub satellite: String,
    pub norad_id: u32,
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub duration_seconds: i64,
}

/// The next overhead pass the countdown runs towards.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PassEvent {
    pub satellite_id: String,
    pub norad_id: u32,
    /// Time of closest approach.
    pub pass_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_elevation_deg: Option<f64>,
}

#[cfg(test)]
impl PassEvent {
    pub fn new(satellite_id: impl Into<String>, pass_time: DateTime<Utc>) -> Self {
        Self {
            satellite_id: satellite_id.into(),
            norad_id: 0,
            pass_time,
            max_elevation_deg: None,
        }
    }
}

impl From<&Pass> for PassEvent {
    fn from(pass: &Pass) -> Self {
        Self {
            satellite_id: pass.satellite.clone(),
            norad_id: pass.norad_id,
            pass_time: pass.tca,
            max_elevation_deg: Some(pass.max_elevation_deg),
        }
    }
}
