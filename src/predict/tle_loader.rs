use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::SatelliteInfo;

pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

/// Where the element set for the tracked satellite comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TleSource {
    /// Local 2-line or 3-line TLE file, possibly holding several satellites.
    File(PathBuf),
    /// CelesTrak GP query by catalog number.
    Celestrak { base_url: String },
}

impl TleSource {
    /// Load the element set for `norad_id`.
    pub fn load(&self, norad_id: u32) -> Result<TleEntry, PredictError> {
        let (source_name, content) = match self {
            TleSource::File(path) => {
                let name = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                (name, fs::read_to_string(path)?)
            }
            TleSource::Celestrak { base_url } => {
                ("celestrak".to_string(), fetch_celestrak(base_url, norad_id)?)
            }
        };

        parse_tle_content(&content, &source_name)?
            .into_iter()
            .find(|entry| entry.info.norad_id == norad_id)
            .ok_or(PredictError::SatelliteNotFound(norad_id))
    }
}

fn fetch_celestrak(base_url: &str, norad_id: u32) -> Result<String, PredictError> {
    log::debug!("Fetching TLE for NORAD {} from {}", norad_id, base_url);
    let response = ureq::get(base_url)
        .query("CATNR", &norad_id.to_string())
        .query("FORMAT", "tle")
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|e| PredictError::Fetch(e.to_string()))?;
    response
        .into_string()
        .map_err(|e| PredictError::Fetch(e.to_string()))
}

/// Parse every TLE in `content` with sgp4
pub fn parse_tle_content(content: &str, source_name: &str) -> Result<Vec<TleEntry>, PredictError> {
    let invalid = |message: String| PredictError::InvalidTle {
        source_name: source_name.to_string(),
        message,
    };

    let mut results = Vec::new();
    for set in split_element_sets(content) {
        let name = set.name.map(str::to_string);
        let elements =
            Elements::from_tle(name.clone(), set.line1.as_bytes(), set.line2.as_bytes())
                .map_err(|e| invalid(e.to_string()))?;
        let constants =
            Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        let norad_id = elements.norad_id as u32;
        results.push(TleEntry {
            info: SatelliteInfo {
                name: name.unwrap_or_else(|| format!("NORAD {}", norad_id)),
                norad_id,
                tle_source: source_name.to_string(),
            },
            elements,
            constants,
        });
    }

    if results.is_empty() {
        return Err(invalid("no element sets found".into()));
    }
    Ok(results)
}

/// Lines of one element set, with the title line when present.
struct RawTle<'a> {
    name: Option<&'a str>,
    line1: &'a str,
    line2: &'a str,
}

/// Splits 2-line and 3-line element sets. A title line may carry the
/// `0 ` prefix used by 3LE files; lines that fit neither shape are skipped.
fn split_element_sets(content: &str) -> Vec<RawTle<'_>> {
    let mut sets = Vec::new();
    let mut name = None;
    let mut line1: Option<&str> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("1 ") {
            if line1.replace(line).is_some() {
                name = None;
            }
        } else if line.starts_with("2 ") {
            match line1.take() {
                Some(first) => sets.push(RawTle {
                    name: name.take(),
                    line1: first,
                    line2: line,
                }),
                None => name = None,
            }
        } else {
            name = Some(line.strip_prefix("0 ").unwrap_or(line));
            line1 = None;
        }
    }

    sets
}
