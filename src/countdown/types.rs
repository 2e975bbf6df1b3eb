use std::fmt;

use chrono::{DateTime, Utc};

pub const ELAPSED_TEXT: &str = "Pass occurring";

/// Whole seconds left until a pass, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub seconds_remaining: u64,
}

impl CountdownState {
    /// Sub-second remainders are truncated, so the last partial second
    /// already counts as elapsed.
    pub fn compute(pass_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = (pass_time - now).num_seconds();
        Self {
            seconds_remaining: u64::try_from(seconds).unwrap_or(0),
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.seconds_remaining == 0
    }

    pub fn countdown(&self) -> Countdown {
        if self.is_elapsed() {
            Countdown::Elapsed
        } else {
            Countdown::Remaining {
                minutes: self.seconds_remaining / 60,
                seconds: self.seconds_remaining % 60,
            }
        }
    }
}

/// Display form of a [`CountdownState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { minutes: u64, seconds: u64 },
    Elapsed,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining { minutes, seconds } => write!(f, "{}:{:02}", minutes, seconds),
            Countdown::Elapsed => f.write_str(ELAPSED_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn between(pass_time: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
        CountdownState::compute(pass_time, now).countdown()
    }

    fn at(offset: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + offset, now)
    }

    #[test]
    fn ninety_seconds_reads_one_thirty() {
        let (pass, now) = at(Duration::seconds(90));
        assert_eq!(between(pass, now).to_string(), "1:30");
    }

    #[test]
    fn five_seconds_is_zero_padded() {
        let (pass, now) = at(Duration::seconds(5));
        assert_eq!(between(pass, now).to_string(), "0:05");
    }

    #[test]
    fn past_pass_is_elapsed_not_negative() {
        let (pass, now) = at(Duration::seconds(-10));
        let countdown = between(pass, now);
        assert_eq!(countdown, Countdown::Elapsed);
        assert_eq!(countdown.to_string(), ELAPSED_TEXT);
        assert_eq!(CountdownState::compute(pass, now).seconds_remaining, 0);
    }

    #[test]
    fn pass_at_now_is_elapsed() {
        let now = Utc::now();
        assert!(CountdownState::compute(now, now).is_elapsed());
    }

    #[test]
    fn partial_last_second_is_elapsed() {
        let (pass, now) = at(Duration::milliseconds(400));
        assert_eq!(between(pass, now), Countdown::Elapsed);
    }

    #[test]
    fn long_waits_keep_counting_minutes() {
        let (pass, now) = at(Duration::minutes(75));
        assert_eq!(between(pass, now).to_string(), "75:00");
    }

    #[test]
    fn minutes_and_seconds_recompose_the_total() {
        let now = Utc::now();
        for total in [1_i64, 59, 60, 61, 599, 3600, 86_399] {
            let state = CountdownState::compute(now + Duration::seconds(total), now);
            assert_eq!(state.seconds_remaining, total as u64);
            match state.countdown() {
                Countdown::Remaining { minutes, seconds } => {
                    assert!(seconds < 60);
                    assert_eq!(minutes * 60 + seconds, total as u64);
                }
                Countdown::Elapsed => panic!("{} seconds left reported as elapsed", total),
            }
        }
    }

    #[test]
    fn same_inputs_same_output() {
        let (pass, now) = at(Duration::seconds(123));
        assert_eq!(between(pass, now), between(pass, now));
    }
}
