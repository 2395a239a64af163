use chrono::{DateTime, Local, Timelike};
use log::debug;

use crate::constants::RESET_CHECK_INTERVAL_SECONDS;
use crate::counter::counter::ObjectCounter;

/// Wall-clock source for the daily reset supervisor. The clock read is
/// the counter's only nondeterministic input, so it lives behind this
/// trait and tests run against fixed clocks.
pub trait TimeSource {
    /// Current local time, or `None` when the host clock cannot be read.
    fn now(&self) -> Option<DateTime<Local>>;
}

/// The host system clock.
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Option<DateTime<Local>> {
        Some(Local::now())
    }
}

impl ObjectCounter {
    /// Clears counts and counted objects at most once when the local
    /// hour enters `reset_hour`. Out-of-range hours disable the
    /// mechanism; checks are rate limited to one per minute. A clock
    /// failure leaves the state untouched.
    pub(crate) fn maybe_daily_reset(&mut self, reset_hour: i32, clock: &dyn TimeSource) {
        if !(0..=23).contains(&reset_hour) {
            return;
        }
        let Some(now) = clock.now() else {
            return;
        };
        let timestamp = now.timestamp();
        if timestamp - self.last_reset_check < RESET_CHECK_INTERVAL_SECONDS {
            return;
        }
        self.last_reset_check = timestamp;

        let current_hour = now.hour() as i32;
        if current_hour == reset_hour && self.last_reset_hour != reset_hour {
            debug!("daily reset fired at hour {}", current_hour);
            self.clear_counts_and_objects();
        }
        // Tracking the observed hour re-arms the trigger once the reset
        // hour is left and entered again on a later day
        self.last_reset_hour = current_hour;
    }
}
