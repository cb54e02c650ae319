use std::fs;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::warn;

use crate::conversation::Message;
use crate::export::{export_file_name, transcript_html};
use crate::ticker::StatusTicker;
use crate::tui::handlers::async_ops::spawn_send;
use crate::tui::types::{App, DESTINATIONS, Mode, TuiMsg, quick_pick_request};
use crate::webhook::WebhookClient;

pub fn handle_event(
    client: &WebhookClient,
    tx: &mpsc::UnboundedSender<TuiMsg>,
    app: &mut App,
    event: Event,
) {
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            match app.mode {
                Mode::Chat => chat_key(client, tx, app, key),
                Mode::DestinationPicker => picker_key(client, tx, app, key),
                Mode::Help => app.mode = Mode::Chat,
            }
        }
    }
}

fn chat_key(
    client: &WebhookClient,
    tx: &mpsc::UnboundedSender<TuiMsg>,
    app: &mut App,
    key: KeyEvent,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('n') if ctrl => reset_conversation(app),
        KeyCode::Char('y') if ctrl => share_trip(app),
        KeyCode::Char('e') if ctrl => export_transcript(app),
        KeyCode::Char('t') if ctrl => app.theme = app.theme.toggle(),
        KeyCode::F(1) => app.mode = Mode::Help,
        KeyCode::F(2) => open_destination_picker(app),
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.input.insert(app.cursor, '\n');
            app.cursor += 1;
        }
        KeyCode::Enter => {
            let text = app.input.iter().collect::<String>();
            send_text(client, tx, app, &text);
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                app.input.remove(app.cursor);
            }
        }
        KeyCode::Delete => {
            if app.cursor < app.input.len() {
                app.input.remove(app.cursor);
            }
        }
        KeyCode::Left => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Right => app.cursor = (app.cursor + 1).min(app.input.len()),
        KeyCode::Home => app.cursor = 0,
        KeyCode::End => app.cursor = app.input.len(),
        KeyCode::PageUp => app.scroll_from_bottom = app.scroll_from_bottom.saturating_add(5),
        KeyCode::PageDown => app.scroll_from_bottom = app.scroll_from_bottom.saturating_sub(5),
        KeyCode::Char(c) if !ctrl => {
            app.input.insert(app.cursor, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn picker_key(
    client: &WebhookClient,
    tx: &mpsc::UnboundedSender<TuiMsg>,
    app: &mut App,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::F(2) => app.mode = Mode::Chat,
        KeyCode::Up => {
            let current = app.destination_state.selected().unwrap_or(0);
            let next = current.checked_sub(1).unwrap_or(DESTINATIONS.len() - 1);
            app.destination_state.select(Some(next));
        }
        KeyCode::Down => {
            let current = app.destination_state.selected().unwrap_or(0);
            app.destination_state
                .select(Some((current + 1) % DESTINATIONS.len()));
        }
        KeyCode::Enter => {
            let idx = app.destination_state.selected().unwrap_or(0);
            app.mode = Mode::Chat;
            let request = quick_pick_request(&DESTINATIONS[idx]);
            send_text(client, tx, app, &request);
        }
        _ => {}
    }
}

/// Input guard plus the local half of the dispatch side-effect sequence:
/// append the user message, set the in-flight flag, start the ticker.
/// Returns the trimmed text to send, or `None` when the send is a no-op
/// (blank input, or a dispatch already in flight).
pub fn begin_dispatch(app: &mut App, text: &str) -> Option<String> {
    if app.waiting {
        return None;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    app.conversation.append(Message::user(trimmed));
    app.input.clear();
    app.cursor = 0;
    app.waiting = true;
    app.ticker = Some(StatusTicker::start(Instant::now()));
    app.status = "The agents are on it...".to_string();
    app.scroll_from_bottom = 0;
    Some(trimmed.to_string())
}

fn send_text(
    client: &WebhookClient,
    tx: &mpsc::UnboundedSender<TuiMsg>,
    app: &mut App,
    text: &str,
) {
    if let Some(trimmed) = begin_dispatch(app, text) {
        spawn_send(client.clone(), tx.clone(), app.session.clone(), trimmed);
    }
}

/// "New Trip": discard the transcript and reseed the greeting.
pub fn reset_conversation(app: &mut App) {
    app.conversation.reset();
    app.celebration = None;
    app.scroll_from_bottom = 0;
    app.last_elapsed_ms = None;
    app.status = "Fresh trip. Where would you like to go?".to_string();
}

/// Put the itinerary blob on the system clipboard. Failure is non-fatal:
/// logged, surfaced in the status line, nothing appended.
pub fn share_trip(app: &mut App) {
    if !app.conversation.has_itinerary() {
        app.status = "Nothing to share yet.".to_string();
        return;
    }

    let trip = app.conversation.share_text();
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(trip)) {
        Ok(()) => app.status = "Trip copied to clipboard!".to_string(),
        Err(err) => {
            warn!("clipboard write failed: {err}");
            app.status = "Could not reach the clipboard.".to_string();
        }
    }
}

/// Write the transcript as an HTML file in the working directory.
pub fn export_transcript(app: &mut App) {
    if !app.conversation.has_itinerary() {
        app.status = "Nothing to export yet.".to_string();
        return;
    }

    let name = export_file_name(chrono::Local::now());
    let html = transcript_html(app.conversation.snapshot());
    match fs::write(&name, html) {
        Ok(()) => app.status = format!("Transcript saved to {name}"),
        Err(err) => {
            warn!("transcript export failed: {err}");
            app.status = "Could not write the transcript file.".to_string();
        }
    }
}

fn open_destination_picker(app: &mut App) {
    if !app.conversation.is_fresh() || app.waiting {
        return;
    }
    if app.destination_state.selected().is_none() {
        app.destination_state.select(Some(0));
    }
    app.mode = Mode::DestinationPicker;
}
