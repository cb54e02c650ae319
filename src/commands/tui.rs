use std::io;
use std::time::{Duration, Instant};

use clap::Args;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Runtime;
use crate::conversation::{Message, Role};
use crate::errors::CliError;
use crate::markdown::{Inline, LineKind, parse_line};
use crate::session::SessionId;
use crate::theme::{Theme, detect_theme};
use crate::tui::handlers::{handle_event, handle_tui_msg};
use crate::tui::types::{App, DESTINATIONS, Mode, TuiMsg, rand_idx};

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// Starting theme ("light" or "dark"); overrides the detected preference
    #[arg(long)]
    pub theme: Option<String>,
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()
            .map_err(|e| CliError::Generic(format!("Failed to enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| CliError::Generic(format!("Failed to enter alternate screen: {e}")))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Show, LeaveAlternateScreen);
    }
}

pub async fn handle(runtime: &Runtime, args: TuiArgs) -> Result<(), CliError> {
    if runtime.output.json {
        return Err(CliError::Usage(
            "`--json` is not supported for `tripchat tui`.".to_string(),
        ));
    }

    let client = runtime.webhook_client()?;
    let webhook_url = runtime.resolved_webhook_url()?;
    let theme = args
        .theme
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_else(|| detect_theme(&runtime.config));
    let session = SessionId::generate();

    let guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| CliError::Generic(format!("Failed to init terminal: {e}")))?;
    terminal
        .clear()
        .map_err(|e| CliError::Generic(format!("Failed to clear terminal: {e}")))?;
    terminal
        .hide_cursor()
        .map_err(|e| CliError::Generic(format!("Failed to hide cursor: {e}")))?;

    let mut app = App::new(webhook_url, theme, session);
    let (tx, mut rx) = mpsc::unbounded_channel::<TuiMsg>();

    loop {
        app.tick(Instant::now());
        terminal
            .draw(|f| ui(f, &mut app))
            .map_err(|e| CliError::Generic(format!("Failed to draw: {e}")))?;

        if app.should_quit {
            break;
        }

        while let Ok(msg) = rx.try_recv() {
            handle_tui_msg(&mut app, msg, Instant::now());
        }

        // Redraw quickly while a dispatch or the celebration is live; stay
        // calm when idle.
        let poll_ms = if app.waiting || app.celebration.is_some() {
            50
        } else {
            120
        };
        if crossterm::event::poll(Duration::from_millis(poll_ms))
            .map_err(|e| CliError::Generic(format!("Event poll failed: {e}")))?
        {
            let event = crossterm::event::read()
                .map_err(|e| CliError::Generic(format!("Event read failed: {e}")))?;
            handle_event(&client, &tx, &mut app, event);
        }
    }

    terminal
        .show_cursor()
        .map_err(|e| CliError::Generic(format!("Failed to restore cursor: {e}")))?;
    drop(guard);
    Ok(())
}

fn ui(f: &mut Frame<'_>, app: &mut App) {
    let size = f.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // transcript
            Constraint::Length(3), // input
            Constraint::Length(1), // status line
        ])
        .split(size);

    render_header(f, app, layout[0]);

    let chat = render_chat(app, layout[1]);
    f.render_widget(chat, layout[1]);

    let input = render_input(app);
    f.render_widget(input, layout[2]);

    if app.mode == Mode::Chat {
        let x = layout[2]
            .x
            .saturating_add(1)
            .saturating_add(INPUT_PROMPT.width() as u16)
            .saturating_add(app.cursor as u16);
        let y = layout[2].y.saturating_add(1);
        f.set_cursor_position((x.min(layout[2].x + layout[2].width.saturating_sub(2)), y));
    }

    render_status_line(f, app, layout[3]);

    match app.mode {
        Mode::DestinationPicker => {
            let area = centered_rect(50, 60, size);
            f.render_widget(Clear, area);
            render_destination_picker(f, app, area);
        }
        Mode::Help => {
            let area = centered_rect(60, 60, size);
            f.render_widget(Clear, area);
            f.render_widget(render_help(app), area);
        }
        Mode::Chat => {}
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let left = Line::from(vec![
        Span::styled(
            " \u{2708}  Nolan's Travel Agent",
            Style::default().fg(c_gold()).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  AI-Powered Trip Planning", muted()),
    ]);

    let right = format!(
        " session {} \u{b7} {} ",
        app.session.short(),
        app.theme.as_str()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(c_bronze()))
        .title(
            Title::from(Line::from(vec![Span::styled(right, muted())]))
                .alignment(Alignment::Right)
                .position(Position::Top),
        );

    let header = Paragraph::new(left).block(block).style(base(app.theme));
    f.render_widget(header, area);
}

fn render_chat(app: &mut App, area: Rect) -> Paragraph<'static> {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let height = area.height.saturating_sub(2).max(1) as usize;

    let all_lines = build_chat_lines(app, width);
    let total = all_lines.len();
    let max_scroll = total.saturating_sub(height);
    let scroll = app.scroll_from_bottom.min(max_scroll);
    let top = max_scroll.saturating_sub(scroll);
    let end = (top + height).min(total);

    let visible = all_lines[top..end].to_vec();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(c_bronze()))
        .title("Trip (PgUp/PgDn scroll)");

    if app.celebrating(Instant::now()) {
        block = block.title(
            Title::from(Line::from(confetti_spans(&mut app.rng, area.width)))
                .alignment(Alignment::Left)
                .position(Position::Bottom),
        );
    }

    Paragraph::new(Text::from(visible))
        .block(block)
        .style(base(app.theme))
        .wrap(Wrap { trim: false })
}

fn build_chat_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut out = Vec::new();

    for msg in app.conversation.snapshot() {
        out.extend(message_lines(msg, width, app.theme));
        out.push(Line::from(""));
    }

    // Synthetic typing row while the agents work; presentation only, never
    // part of the conversation.
    if app.waiting {
        if let Some(ticker) = app.ticker.as_ref() {
            out.push(Line::from(vec![
                assistant_prefix(),
                Span::styled(
                    ticker.message().to_string(),
                    muted().add_modifier(Modifier::ITALIC),
                ),
            ]));
            out.push(Line::from(""));
        }
    }

    if app.conversation.is_fresh() && !app.waiting {
        out.push(Line::from(Span::styled(
            "Popular destinations (F2):",
            muted(),
        )));
        let picks = DESTINATIONS
            .iter()
            .map(|d| format!("{} {}", d.emoji, d.name))
            .collect::<Vec<_>>()
            .join("   ");
        out.push(Line::from(Span::styled(picks, base(app.theme))));
    }

    out
}

fn message_lines(msg: &Message, width: usize, theme: Theme) -> Vec<Line<'static>> {
    let prefix = match msg.role {
        Role::User => Span::styled(
            "You \u{25b8} ",
            Style::default().fg(c_bronze()).add_modifier(Modifier::BOLD),
        ),
        Role::Assistant => assistant_prefix(),
    };
    let content_style = if msg.is_error {
        Style::default().fg(c_error())
    } else {
        base(theme)
    };

    let prefix_width = prefix.content.as_ref().width();
    let indent = " ".repeat(prefix_width);
    let avail = width.saturating_sub(prefix_width).max(1);

    let mut out = Vec::new();
    for (idx, raw_line) in msg.content.split('\n').enumerate() {
        let raw_line = raw_line.trim_end_matches('\r');
        if raw_line.is_empty() {
            out.push(if idx == 0 {
                Line::from(prefix.clone())
            } else {
                Line::from("")
            });
            continue;
        }

        let spans = line_spans(raw_line, content_style, theme);
        for (widx, mut wrapped) in wrap_spans(&spans, avail).into_iter().enumerate() {
            let mut row = Vec::new();
            if idx == 0 && widx == 0 {
                row.push(prefix.clone());
            } else {
                row.push(Span::raw(indent.clone()));
            }
            row.append(&mut wrapped);
            out.push(Line::from(row));
        }
    }
    out
}

/// Style one logical line of message content for the terminal, mirroring
/// the markdown-lite rule order.
fn line_spans(raw: &str, content_style: Style, theme: Theme) -> Vec<Span<'static>> {
    match parse_line(raw) {
        LineKind::Heading(text) => vec![Span::styled(
            text,
            Style::default()
                .fg(c_gold())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )],
        LineKind::TableRow(text) => vec![Span::styled(text, Style::default().fg(c_stone()))],
        LineKind::Text(inlines) => inlines
            .into_iter()
            .flat_map(|inline| match inline {
                Inline::Plain(text) => vec![Span::styled(text, content_style)],
                Inline::Bold(text) => {
                    vec![Span::styled(text, content_style.add_modifier(Modifier::BOLD))]
                }
                Inline::Italic(text) => vec![Span::styled(
                    text,
                    content_style.add_modifier(Modifier::ITALIC),
                )],
                Inline::Link { label, url } => vec![
                    Span::styled(
                        label,
                        Style::default()
                            .fg(c_gold())
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::styled(format!(" ({url})"), muted()),
                ],
            })
            .collect(),
    }
}

/// Word-aware wrap over styled spans. Words never split across spans; a
/// single word wider than the line is hard-broken.
fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    if width <= 1 {
        return vec![spans.to_vec()];
    }

    let mut lines: Vec<Vec<Span<'static>>> = Vec::new();
    let mut cur: Vec<Span<'static>> = Vec::new();
    let mut cur_w = 0usize;

    let mut break_line = |cur: &mut Vec<Span<'static>>, cur_w: &mut usize| {
        // drop the separator spaces left hanging at the break
        while let Some(last) = cur.last_mut() {
            let trimmed = last.content.as_ref().trim_end_matches(' ');
            if trimmed.len() == last.content.as_ref().len() {
                break;
            }
            if trimmed.is_empty() {
                cur.pop();
            } else {
                *last = Span::styled(trimmed.to_string(), last.style);
                break;
            }
        }
        lines.push(std::mem::take(cur));
        *cur_w = 0;
    };

    for span in spans {
        let style = span.style;
        for word in split_keeping_spaces(span.content.as_ref()) {
            let word_w = word.width();
            let is_space = word.trim().is_empty();
            if cur_w + word_w > width && cur_w > 0 {
                break_line(&mut cur, &mut cur_w);
                if is_space {
                    continue;
                }
            }
            if word_w > width {
                // hard-break an over-long word
                for ch in word.chars() {
                    let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if cur_w + cw > width && cur_w > 0 {
                        break_line(&mut cur, &mut cur_w);
                    }
                    cur.push(Span::styled(ch.to_string(), style));
                    cur_w += cw;
                }
            } else {
                cur.push(Span::styled(word.to_string(), style));
                cur_w += word_w;
            }
        }
    }

    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Alternating words and space runs, preserving the original spacing.
fn split_keeping_spaces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let is_space = ch == ' ';
        match in_space {
            None => in_space = Some(is_space),
            Some(prev) if prev != is_space => {
                out.push(&text[start..idx]);
                start = idx;
                in_space = Some(is_space);
            }
            _ => {}
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

const INPUT_PROMPT: &str = "\u{276f} ";

fn render_input(app: &App) -> Paragraph<'static> {
    let input = app.input.iter().collect::<String>().replace('\n', "\u{23ce}");

    let line = if input.is_empty() && !app.waiting {
        Line::from(vec![
            Span::styled(INPUT_PROMPT, Style::default().fg(c_gold())),
            Span::styled("Where would you like to go?", muted()),
        ])
    } else {
        Line::from(vec![
            Span::styled(INPUT_PROMPT, Style::default().fg(c_gold())),
            Span::styled(input, base(app.theme)),
        ])
    };

    let title = if app.waiting {
        "Hang tight..."
    } else {
        "Message (Enter send \u{b7} Alt+Enter newline)"
    };

    Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(c_bronze()))
                .title(title),
        )
        .style(base(app.theme))
}

fn render_status_line(f: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width as usize;

    let left = if let Some(ticker) = app.ticker.as_ref() {
        Span::styled(
            ticker.message().to_string(),
            Style::default().fg(c_gold()).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(app.status.clone(), muted())
    };

    let hints = "F1 help \u{b7} F2 destinations \u{b7} Ctrl+N new trip \u{b7} Ctrl+Y share \u{b7} Esc quit";
    let left_w = left.content.as_ref().width();
    let hints_w = hints.width();

    let mut spans = vec![left];
    if width > left_w + hints_w + 1 {
        spans.push(Span::raw(" ".repeat(width - left_w - hints_w)));
        spans.push(Span::styled(hints.to_string(), muted()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(base(app.theme)), area);
}

fn render_destination_picker(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = DESTINATIONS
        .iter()
        .map(|d| ListItem::new(format!(" {}  {}", d.emoji, d.name)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(c_gold()))
                .title("Popular destinations (Enter picks, Esc closes)"),
        )
        .style(base(app.theme))
        .highlight_style(
            Style::default()
                .fg(c_ink())
                .bg(c_gold())
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut app.destination_state);
}

fn render_help(app: &App) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter        send the message"),
        Line::from("Alt+Enter    newline in the input"),
        Line::from("F2           destination quick picks (fresh trip only)"),
        Line::from("Ctrl+N       new trip (clears the conversation)"),
        Line::from("Ctrl+Y       copy the itinerary to the clipboard"),
        Line::from("Ctrl+E       export the transcript as HTML"),
        Line::from("Ctrl+T       toggle light/dark theme"),
        Line::from("PgUp/PgDn    scroll the transcript"),
        Line::from("Esc          quit"),
        Line::from(""),
        Line::from(Span::styled(
            format!("webhook: {}", app.webhook_url),
            muted(),
        )),
    ];
    if let Some(elapsed) = app.last_elapsed_ms {
        lines.push(Line::from(Span::styled(
            format!("last reply: {elapsed} ms"),
            muted(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Any key closes this help.",
        Style::default().fg(c_stone()),
    )));

    Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(c_gold()))
                .title("Help"),
        )
        .style(base(app.theme))
        .wrap(Wrap { trim: false })
}

fn assistant_prefix() -> Span<'static> {
    Span::styled(
        "\u{2708} ",
        Style::default().fg(c_gold()).add_modifier(Modifier::BOLD),
    )
}

const CONFETTI_GLYPHS: [&str; 5] = ["\u{2726}", "\u{2727}", "\u{25cf}", "\u{25c6}", "\u{25aa}"];

fn confetti_spans(rng: &mut u64, area_width: u16) -> Vec<Span<'static>> {
    let colors = [c_gold(), c_bronze(), c_cream(), c_stone()];
    let count = (area_width as usize / 4).clamp(4, 24);

    let mut spans = Vec::with_capacity(count * 2);
    spans.push(Span::raw(" "));
    for _ in 0..count {
        let glyph = CONFETTI_GLYPHS[rand_idx(rng, CONFETTI_GLYPHS.len())];
        let color = colors[rand_idx(rng, colors.len())];
        spans.push(Span::styled(glyph, Style::default().fg(color)));
        spans.push(Span::raw(" ".repeat(1 + rand_idx(rng, 3))));
    }
    spans
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// Palette lifted from the trip-planning brand: gold, bronze, cream, stone,
// ink.
fn c_gold() -> Color {
    Color::Rgb(196, 165, 116)
}

fn c_bronze() -> Color {
    Color::Rgb(160, 128, 80)
}

fn c_cream() -> Color {
    Color::Rgb(245, 242, 237)
}

fn c_stone() -> Color {
    Color::Rgb(107, 101, 96)
}

fn c_ink() -> Color {
    Color::Rgb(45, 41, 38)
}

fn c_error() -> Color {
    Color::Rgb(220, 80, 80)
}

fn base(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().bg(c_ink()).fg(c_cream()),
        Theme::Light => Style::default().bg(c_cream()).fg(c_ink()),
    }
}

fn muted() -> Style {
    Style::default().fg(c_stone()).add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Vec<Span<'static>> {
        vec![Span::raw(text.to_string())]
    }

    #[test]
    fn wrap_spans_keeps_short_lines_whole() {
        let lines = wrap_spans(&plain("a short line"), 40);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn wrap_spans_breaks_on_word_boundaries() {
        let lines = wrap_spans(&plain("alpha beta gamma"), 11);
        let rendered: Vec<String> = lines
            .iter()
            .map(|spans| spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rendered, vec!["alpha beta".to_string(), "gamma".to_string()]);
    }

    #[test]
    fn wrap_spans_hard_breaks_oversized_words() {
        let lines = wrap_spans(&plain("abcdefghij"), 4);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn split_keeping_spaces_round_trips() {
        let text = "a  b   c";
        assert_eq!(split_keeping_spaces(text).concat(), text);
    }
}
