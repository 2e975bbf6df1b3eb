use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::view::CountdownView;
use crate::predict::PassSlot;

/// Periodic task that recomputes the countdown and publishes it to the
/// display channel.
pub struct RefreshLoop {
    pass: PassSlot,
    interval: Duration,
    display: watch::Sender<CountdownView>,
}

impl RefreshLoop {
    pub fn new(pass: PassSlot, interval: Duration) -> (Self, watch::Receiver<CountdownView>) {
        let (display, receiver) = watch::channel(CountdownView::pending());
        (
            Self {
                pass,
                interval,
                display,
            },
            receiver,
        )
    }

    /// One refresh tick: read the prediction, render, publish.
    pub fn tick(&self, now: DateTime<Utc>) -> CountdownView {
        let view = CountdownView::render(self.pass.get().as_ref(), now);

        let previous = self.display.borrow().phase;
        if previous != view.phase {
            log::info!("Countdown {} -> {} ({})", previous, view.phase, view.display);
        } else {
            log::trace!("Countdown tick: {}", view.display);
        }

        self.display.send_replace(view.clone());
        view
    }

    /// Tick until every display receiver is gone.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.display.closed() => break,
                _ = interval.tick() => {
                    self.tick(Utc::now());
                }
            }
        }

        log::debug!("Refresh loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::view::{Phase, PENDING_TEXT};
    use crate::predict::PassEvent;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn tick_without_prediction_publishes_placeholder() {
        let (refresh, receiver) = RefreshLoop::new(PassSlot::new(), Duration::from_secs(1));
        let view = refresh.tick(Utc::now());
        assert_eq!(view.phase, Phase::Pending);
        assert_eq!(receiver.borrow().display, PENDING_TEXT);
    }

    #[test]
    fn tick_reads_the_injected_slot() {
        let slot = PassSlot::new();
        let (refresh, receiver) = RefreshLoop::new(slot.clone(), Duration::from_secs(1));
        let now = Utc::now();

        slot.set(Some(PassEvent::new("ISS", now + ChronoDuration::seconds(5))));
        refresh.tick(now);
        assert_eq!(receiver.borrow().display, "0:05");

        refresh.tick(now + ChronoDuration::seconds(15));
        assert_eq!(receiver.borrow().phase, Phase::Elapsed);
    }

    #[test]
    fn tick_survives_dropped_receivers() {
        let (refresh, receiver) = RefreshLoop::new(PassSlot::new(), Duration::from_secs(1));
        drop(receiver);
        assert_eq!(refresh.tick(Utc::now()).phase, Phase::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn run_publishes_and_stops_when_receivers_drop() {
        let slot = PassSlot::new();
        slot.set(Some(PassEvent::new(
            "ISS",
            Utc::now() + ChronoDuration::seconds(90),
        )));
        let (refresh, mut receiver) = RefreshLoop::new(slot, Duration::from_secs(1));
        let handle = tokio::spawn(refresh.run());

        receiver.changed().await.unwrap();
        {
            let view = receiver.borrow_and_update();
            assert_eq!(view.phase, Phase::Counting);
            assert!(matches!(view.seconds_remaining, Some(85..=90)));
        }

        // Paused clock: advances straight to the next tick.
        tokio::time::sleep(Duration::from_secs(1)).await;
        receiver.changed().await.unwrap();

        drop(receiver);
        handle.await.unwrap();
    }
}
