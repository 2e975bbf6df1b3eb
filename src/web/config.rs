use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::predict::{
    GroundStation, PredictionSchedule, SgpPredictor, TleSource, CELESTRAK_GP_URL,
};

const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);
const MAX_SEARCH_HORIZON: Duration = Duration::from_secs(30 * 24 * 60 * 60);
const MAX_SCHEDULE_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub station: StationConfig,
    pub satellite: SatelliteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub refresh_interval: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8050".to_string(),
            refresh_interval: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    pub altitude_m: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            name: None,
            coordinates: "0.0, 0.0".to_string(),
            altitude_m: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    pub norad_id: u32,
    /// Read elements from this file instead of CelesTrak.
    pub tle_file: Option<PathBuf>,
    pub celestrak_url: String,
    pub min_elevation_deg: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub search_horizon: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub repredict_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub pass_linger: Duration,
    /// Loaded elements are reused until they are this old.
    #[serde(deserialize_with = "deserialize_duration")]
    pub tle_max_age: Duration,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            norad_id: 25544,
            tle_file: None,
            celestrak_url: CELESTRAK_GP_URL.to_string(),
            min_elevation_deg: 0.0,
            search_horizon: Duration::from_secs(24 * 60 * 60),
            repredict_interval: Duration::from_secs(60 * 60),
            pass_linger: Duration::from_secs(60),
            tle_max_age: Duration::from_secs(6 * 60 * 60),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration(
            "web.refresh_interval",
            self.web.refresh_interval,
            MAX_REFRESH_INTERVAL,
        )?;
        let satellite = &self.satellite;
        check_duration(
            "satellite.search_horizon",
            satellite.search_horizon,
            MAX_SEARCH_HORIZON,
        )?;
        check_duration(
            "satellite.repredict_interval",
            satellite.repredict_interval,
            MAX_SCHEDULE_INTERVAL,
        )?;
        if satellite.pass_linger > MAX_SCHEDULE_INTERVAL {
            return Err(ConfigError::Invalid(format!(
                "satellite.pass_linger must not exceed {}",
                humantime::format_duration(MAX_SCHEDULE_INTERVAL)
            )));
        }
        if satellite.tle_max_age > MAX_SCHEDULE_INTERVAL {
            return Err(ConfigError::Invalid(format!(
                "satellite.tle_max_age must not exceed {}",
                humantime::format_duration(MAX_SCHEDULE_INTERVAL)
            )));
        }
        self.ground_station()?;
        Ok(())
    }

    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        GroundStation::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "invalid station coordinates: {:?}",
                    self.station.coordinates
                ))
            })
    }

    /// Heading for the dashboard: the station name, else its coordinates.
    pub fn station_label(&self) -> String {
        if let Some(name) = &self.station.name {
            return name.clone();
        }
        match self.ground_station() {
            Ok(station) => format!(
                "{:.4}°, {:.4}°",
                station.latitude_deg, station.longitude_deg
            ),
            Err(_) => self.station.coordinates.clone(),
        }
    }

    pub fn tle_source(&self) -> TleSource {
        match &self.satellite.tle_file {
            Some(path) => TleSource::File(path.clone()),
            None => TleSource::Celestrak {
                base_url: self.satellite.celestrak_url.clone(),
            },
        }
    }

    pub fn predictor(&self) -> Result<SgpPredictor, ConfigError> {
        Ok(SgpPredictor::new(
            self.tle_source(),
            self.satellite.norad_id,
            self.ground_station()?,
            self.satellite.min_elevation_deg,
            chrono_duration(self.satellite.search_horizon)?,
            chrono_duration(self.satellite.tle_max_age)?,
        ))
    }

    pub fn prediction_schedule(&self) -> Result<PredictionSchedule, ConfigError> {
        Ok(PredictionSchedule {
            repredict_interval: chrono_duration(self.satellite.repredict_interval)?,
            pass_linger: chrono_duration(self.satellite.pass_linger)?,
        })
    }
}

/// Rejects zero and anything above `max`.
fn check_duration(key: &str, value: Duration, max: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Invalid(format!(
            "{} must be greater than zero",
            key
        )));
    }
    if value > max {
        return Err(ConfigError::Invalid(format!(
            "{} must not exceed {}",
            key,
            humantime::format_duration(max)
        )));
    }
    Ok(())
}

fn chrono_duration(d: Duration) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(d).map_err(|e| ConfigError::Invalid(e.to_string()))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
