mod error;
mod ground_station;
mod pass_finder;
mod predictor;
mod propagation;
mod slot;
mod task;
mod tle_loader;
mod types;

pub use ground_station::GroundStation;
pub use predictor::{PassPredictor, SgpPredictor};
pub use slot::PassSlot;
pub use task::{PredictionSchedule, PredictionTask};
pub use tle_loader::{TleSource, CELESTRAK_GP_URL};
pub use types::PassEvent;

#[cfg(test)]
pub(crate) mod test_support {
    use super::tle_loader::{parse_tle_content, TleEntry};

    pub const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    pub const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
    pub const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    pub fn iss_entry() -> TleEntry {
        parse_tle_content(ISS_TLE, "test")
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }
}
