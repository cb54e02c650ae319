use chrono::{DateTime, Local};

use crate::conversation::Message;
use crate::markdown::render_html;

/// Assemble the conversation as a standalone HTML document. Message content
/// goes through the markdown-lite renderer, which escapes raw text before
/// its substitutions run.
pub fn transcript_html(messages: &[Message]) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>My Travel Itinerary</title>\n</head>\n<body>\n");
    out.push_str("<h1>My Travel Itinerary</h1>\n");

    for message in messages {
        let mut class = message.role.as_str().to_string();
        if message.is_error {
            class.push_str(" error");
        }
        out.push_str(&format!(
            "<div class=\"message {class}\">{}</div>\n",
            render_html(&message.content)
        ));
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("trip-{}.html", now.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn transcript_renders_each_message_through_markdown_lite() {
        let messages = vec![
            Message::welcome(),
            Message::user("plan **Paris**"),
            Message::assistant("# Plan\nDay 1"),
        ];
        let html = transcript_html(&messages);
        assert!(html.contains("<strong>Paris</strong>"));
        assert!(html.contains("<span class=\"heading\">Plan</span><br />Day 1"));
        assert!(html.contains("<div class=\"message user\">"));
    }

    #[test]
    fn error_messages_are_marked() {
        let messages = vec![Message::error("no network")];
        let html = transcript_html(&messages);
        assert!(html.contains("assistant error"));
    }

    #[test]
    fn raw_angle_brackets_never_reach_the_document() {
        let messages = vec![Message::assistant("<script>alert(1)</script>")];
        let html = transcript_html(&messages);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn file_name_carries_the_timestamp() {
        let when = Local.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
        assert_eq!(export_file_name(when), "trip-20260807-093000.html");
    }
}
