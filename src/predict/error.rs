use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {source_name}: {message}")]
    InvalidTle {
        source_name: String,
        message: String,
    },
    #[error("Satellite {0} not found in TLE source")]
    SatelliteNotFound(u32),
    #[error("TLE fetch failed: {0}")]
    Fetch(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Prediction worker failed: {0}")]
    Worker(String),
}
