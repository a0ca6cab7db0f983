use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-period timer driven by timestamps handed in by the caller.
///
/// The last-tick timestamp moves forward in whole periods, so a frame that
/// lands 30ms late carries those 30ms into the next period instead of
/// dropping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    period: Duration,
    last_tick: Duration,
}

impl Ticker {
    /// Starts a ticker whose first tick is due one `period` after `now`.
    /// A zero period is raised to 1ms.
    pub fn new(period: Duration, now: Duration) -> Self {
        if period.is_zero() {
            log::warn!("Zero ticker period, using {MIN_PERIOD:?}");
        }
        Self {
            period: period.max(MIN_PERIOD),
            last_tick: now,
        }
    }

    /// Returns how many periods elapsed since the last tick and consumes them.
    /// A clock that went backwards yields zero.
    pub fn poll(&mut self, now: Duration) -> u32 {
        let mut ticks = 0;
        while now.saturating_sub(self.last_tick) >= self.period {
            self.last_tick += self.period;
            ticks += 1;
        }
        ticks
    }
}
