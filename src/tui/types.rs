use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::conversation::Conversation;
use crate::errors::CliError;
use crate::session::SessionId;
use crate::theme::Theme;
use crate::ticker::StatusTicker;
use crate::webhook::WebhookReply;

/// How long the celebration pulse stays visible after a finished itinerary.
pub const CELEBRATION_WINDOW: Duration = Duration::from_secs(4);

/// Curated destination shortcuts shown on the welcome screen.
#[derive(Debug, Clone, Copy)]
pub struct Destination {
    pub name: &'static str,
    pub emoji: &'static str,
}

pub const DESTINATIONS: [Destination; 6] = [
    Destination { name: "Paris", emoji: "\u{1f5fc}" },
    Destination { name: "Tokyo", emoji: "\u{1f3ef}" },
    Destination { name: "Bali", emoji: "\u{1f3dd}\u{fe0f}" },
    Destination { name: "New York", emoji: "\u{1f5fd}" },
    Destination { name: "Barcelona", emoji: "\u{1f1ea}\u{1f1f8}" },
    Destination { name: "Iceland", emoji: "\u{1f9ca}" },
];

pub fn quick_pick_request(destination: &Destination) -> String {
    format!(
        "I want to go to {} for a week. Best value options please!",
        destination.name
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    DestinationPicker,
    Help,
}

#[derive(Debug)]
pub struct App {
    pub mode: Mode,
    pub should_quit: bool,

    pub webhook_url: String,
    pub theme: Theme,
    pub session: SessionId,
    pub conversation: Conversation,

    pub input: Vec<char>,
    pub cursor: usize,

    /// In-flight flag: at most one dispatch awaits its reply at a time.
    pub waiting: bool,
    pub ticker: Option<StatusTicker>,
    /// Deadline of the active celebration pulse, if any.
    pub celebration: Option<Instant>,

    pub status: String,
    pub last_elapsed_ms: Option<u128>,
    pub scroll_from_bottom: usize,
    pub destination_state: ListState,
    pub rng: u64,
}

impl App {
    pub fn new(webhook_url: String, theme: Theme, session: SessionId) -> Self {
        Self {
            mode: Mode::Chat,
            should_quit: false,
            webhook_url,
            theme,
            session,
            conversation: Conversation::new(),
            input: Vec::new(),
            cursor: 0,
            waiting: false,
            ticker: None,
            celebration: None,
            status: "Where would you like to go?".to_string(),
            last_elapsed_ms: None,
            scroll_from_bottom: 0,
            destination_state: ListState::default(),
            rng: seed_rng(),
        }
    }

    /// Per-frame housekeeping: rotate the ticker and expire the celebration.
    pub fn tick(&mut self, now: Instant) {
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.advance(now);
        }
        if let Some(deadline) = self.celebration {
            if now >= deadline {
                self.celebration = None;
            }
        }
    }

    pub fn celebrating(&self, now: Instant) -> bool {
        self.celebration.is_some_and(|deadline| now < deadline)
    }
}

/// Result of an async dispatch, delivered back to the UI loop.
#[derive(Debug)]
pub enum TuiMsg {
    Reply(Result<WebhookReply, CliError>),
}

fn seed_rng() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
        | 1
}

/// Tiny xorshift, enough to scatter confetti glyphs.
pub fn rand_idx(rng: &mut u64, len: usize) -> usize {
    let mut x = *rng;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *rng = x;
    (x % len.max(1) as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::LOADING_MESSAGES;

    fn test_app() -> App {
        App::new(
            "https://example.com/hook".to_string(),
            Theme::Dark,
            SessionId::generate(),
        )
    }

    #[test]
    fn tick_expires_the_celebration() {
        let mut app = test_app();
        let now = Instant::now();
        app.celebration = Some(now + CELEBRATION_WINDOW);
        assert!(app.celebrating(now));

        app.tick(now + CELEBRATION_WINDOW);
        assert!(app.celebration.is_none());
    }

    #[test]
    fn tick_rotates_an_active_ticker() {
        let mut app = test_app();
        let now = Instant::now();
        app.ticker = Some(crate::ticker::StatusTicker::start(now));

        app.tick(now + crate::ticker::ROTATE_INTERVAL);
        assert_eq!(
            app.ticker.as_ref().unwrap().message(),
            LOADING_MESSAGES[1]
        );
    }

    #[test]
    fn quick_pick_builds_the_canned_request() {
        assert_eq!(
            quick_pick_request(&DESTINATIONS[0]),
            "I want to go to Paris for a week. Best value options please!"
        );
    }

    #[test]
    fn rand_idx_stays_in_bounds() {
        let mut rng = 42u64;
        for _ in 0..100 {
            assert!(rand_idx(&mut rng, 5) < 5);
        }
    }
}
