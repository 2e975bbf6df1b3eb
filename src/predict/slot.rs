use std::sync::{Arc, PoisonError, RwLock};

use crate::predict::types::PassEvent;

/// Shared cell holding the current pass prediction.
///
/// Written by the prediction task, read by every refresh tick and HTTP
/// handler. Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct PassSlot {
    inner: Arc<RwLock<Option<PassEvent>>>,
}

impl PassSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<PassEvent> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored prediction, returning the previous one.
    pub fn set(&self, event: Option<PassEvent>) -> Option<PassEvent> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn clones_share_the_same_prediction() {
        let slot = PassSlot::new();
        let reader = slot.clone();
        assert_eq!(reader.get(), None);

        let event = PassEvent::new("ISS (ZARYA)", Utc::now());
        assert_eq!(slot.set(Some(event.clone())), None);
        assert_eq!(reader.get(), Some(event.clone()));
        assert_eq!(slot.set(None), Some(event));
        assert_eq!(reader.get(), None);
    }
}
