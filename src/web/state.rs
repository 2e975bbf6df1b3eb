use std::sync::Arc;
use tokio::sync::watch;

use crate::countdown::CountdownView;
use crate::predict::PassSlot;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pass: PassSlot,
    pub countdown: watch::Receiver<CountdownView>,
}

impl AppState {
    /// Latest view published by the refresh loop.
    pub fn current_view(&self) -> CountdownView {
        self.countdown.borrow().clone()
    }
}
