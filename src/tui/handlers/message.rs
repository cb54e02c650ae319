use std::time::Instant;

use tracing::warn;

use crate::conversation::Message;
use crate::parse::reply::{is_trip_complete, normalize_reply};
use crate::tui::types::{App, CELEBRATION_WINDOW, TuiMsg};

/// Apply the outcome of a dispatch to the app state. Success appends the
/// normalized assistant message; failure appends a locally synthesized
/// error message. Either way the in-flight flag clears, the ticker stops,
/// and the next send is permitted.
pub fn handle_tui_msg(app: &mut App, msg: TuiMsg, now: Instant) {
    match msg {
        TuiMsg::Reply(res) => {
            app.waiting = false;
            app.ticker = None;

            match res {
                Ok(reply) => {
                    app.last_elapsed_ms = Some(reply.elapsed_ms);
                    let content = normalize_reply(&reply.json);
                    if is_trip_complete(&content) {
                        app.celebration = Some(now + CELEBRATION_WINDOW);
                        app.status = "Trip planned! \u{2708}".to_string();
                    } else {
                        app.status = "Where to next?".to_string();
                    }
                    app.conversation.append(Message::assistant(content));
                }
                Err(err) => {
                    warn!("dispatch failed: {err}");
                    app.conversation.append(Message::error(format!(
                        "Sorry, I couldn't connect to the travel planning service. Please try again.\n\nError: {err}"
                    )));
                    app.status = "Send failed.".to_string();
                }
            }

            app.scroll_from_bottom = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::conversation::Role;
    use crate::errors::CliError;
    use crate::session::SessionId;
    use crate::theme::Theme;
    use crate::ticker::StatusTicker;
    use crate::webhook::WebhookReply;

    fn waiting_app() -> App {
        let mut app = App::new(
            "https://example.com/hook".to_string(),
            Theme::Dark,
            SessionId::generate(),
        );
        app.conversation.append(Message::user("plan a trip"));
        app.waiting = true;
        app.ticker = Some(StatusTicker::start(Instant::now()));
        app
    }

    fn reply(body: serde_json::Value) -> TuiMsg {
        TuiMsg::Reply(Ok(WebhookReply {
            elapsed_ms: 12,
            json: body,
        }))
    }

    #[test]
    fn success_appends_the_normalized_assistant_message() {
        let mut app = waiting_app();
        handle_tui_msg(&mut app, reply(json!({"output": "Day 1: Louvre"})), Instant::now());

        assert!(!app.waiting);
        assert!(app.ticker.is_none());
        assert_eq!(app.conversation.len(), 3);
        let last = app.conversation.snapshot().last().unwrap().clone();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Day 1: Louvre");
        assert!(!last.is_error);
    }

    #[test]
    fn failure_appends_exactly_one_error_message_and_clears_the_flag() {
        let mut app = waiting_app();
        handle_tui_msg(
            &mut app,
            TuiMsg::Reply(Err(CliError::Server(
                "Request failed with status 502".to_string(),
            ))),
            Instant::now(),
        );

        assert!(!app.waiting);
        assert!(app.ticker.is_none());
        assert_eq!(app.conversation.len(), 3);
        let last = app.conversation.snapshot().last().unwrap().clone();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.is_error);
        assert!(last.content.contains("status 502"));
    }

    #[test]
    fn total_marker_starts_the_celebration_pulse() {
        let mut app = waiting_app();
        let now = Instant::now();
        handle_tui_msg(&mut app, reply(json!({"output": "TOTAL: $1,999"})), now);

        assert!(app.celebrating(now));
        assert!(app.celebrating(now + CELEBRATION_WINDOW - std::time::Duration::from_millis(1)));
        assert!(!app.celebrating(now + CELEBRATION_WINDOW));
    }

    #[test]
    fn plain_reply_does_not_celebrate() {
        let mut app = waiting_app();
        let now = Instant::now();
        handle_tui_msg(&mut app, reply(json!({"text": "still looking"})), now);
        assert!(!app.celebrating(now));
    }

    #[test]
    fn store_grows_by_two_per_completed_cycle() {
        let mut app = App::new(
            "https://example.com/hook".to_string(),
            Theme::Dark,
            SessionId::generate(),
        );
        for n in 1..=4u64 {
            app.conversation.append(Message::user(format!("trip {n}")));
            app.waiting = true;
            let outcome = if n % 2 == 0 {
                TuiMsg::Reply(Err(CliError::Network("unreachable".to_string())))
            } else {
                reply(json!({"response": "working on it"}))
            };
            handle_tui_msg(&mut app, outcome, Instant::now());
            assert_eq!(app.conversation.len() as u64, 1 + 2 * n);
            assert!(!app.waiting);
        }
    }
}
