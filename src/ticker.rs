use std::time::{Duration, Instant};

/// What the agents are supposedly up to while a request is in flight.
pub const LOADING_MESSAGES: [&str; 7] = [
    "The Snob is browsing five-star hotels...",
    "The Miser is hunting for deals...",
    "Comparing business class vs budget airlines...",
    "Researching hidden local gems...",
    "The Boss is making final decisions...",
    "Crunching the numbers...",
    "Finding the perfect balance...",
];

pub const ROTATE_INTERVAL: Duration = Duration::from_secs(3);

/// Rotating status line for the dispatch window. Owned by the app state as
/// an `Option`: started when a dispatch begins, dropped the moment it
/// concludes, so two concurrent tickers cannot exist and there is no
/// trailing tick.
#[derive(Debug)]
pub struct StatusTicker {
    index: usize,
    last_rotate: Instant,
}

impl StatusTicker {
    pub fn start(now: Instant) -> Self {
        Self {
            index: 0,
            last_rotate: now,
        }
    }

    /// Advance to the next message once the interval has elapsed, wrapping
    /// to the start after the last entry.
    pub fn advance(&mut self, now: Instant) {
        if now.duration_since(self.last_rotate) >= ROTATE_INTERVAL {
            self.index = (self.index + 1) % LOADING_MESSAGES.len();
            self.last_rotate = now;
        }
    }

    pub fn message(&self) -> &'static str {
        LOADING_MESSAGES[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_first_message() {
        let ticker = StatusTicker::start(Instant::now());
        assert_eq!(ticker.message(), LOADING_MESSAGES[0]);
    }

    #[test]
    fn holds_until_the_interval_elapses() {
        let start = Instant::now();
        let mut ticker = StatusTicker::start(start);
        ticker.advance(start + Duration::from_millis(2999));
        assert_eq!(ticker.message(), LOADING_MESSAGES[0]);
        ticker.advance(start + ROTATE_INTERVAL);
        assert_eq!(ticker.message(), LOADING_MESSAGES[1]);
    }

    #[test]
    fn wraps_after_the_last_entry() {
        let mut now = Instant::now();
        let mut ticker = StatusTicker::start(now);
        for expected in LOADING_MESSAGES.iter().cycle().skip(1).take(9) {
            now += ROTATE_INTERVAL;
            ticker.advance(now);
            assert_eq!(ticker.message(), *expected);
        }
    }
}
