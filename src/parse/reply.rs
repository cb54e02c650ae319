use serde_json::Value;

/// Named fields probed for the reply text, in contract order. The remote
/// workflow is inconsistent about its reply shape; this precedence is the
/// whole agreement with it, so keep it a list rather than conditionals.
pub const REPLY_FIELDS: [&str; 3] = ["output", "text", "response"];

/// Substrings of assistant content that mean a finished itinerary landed.
pub const COMPLETION_MARKERS: [&str; 3] = ["Itinerary", "TOTAL", "\u{2708}\u{fe0f}"];

/// Normalize an arbitrary reply body into displayable text.
/// Precedence: `output`, else `text`, else `response`, else the body itself
/// when it is a bare string, else a generic serialization of the whole body.
/// An extractor only matches a non-empty string value; anything else falls
/// through to the next one.
pub fn normalize_reply(payload: &Value) -> String {
    for field in REPLY_FIELDS {
        if let Some(text) = payload
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            return text.to_string();
        }
    }

    if let Some(text) = payload.as_str() {
        return text.to_string();
    }

    payload.to_string()
}

pub fn is_trip_complete(content: &str) -> bool {
    COMPLETION_MARKERS
        .iter()
        .any(|marker| content.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_wins_over_text() {
        assert_eq!(normalize_reply(&json!({"output": "A", "text": "B"})), "A");
    }

    #[test]
    fn text_wins_over_response() {
        assert_eq!(
            normalize_reply(&json!({"text": "B", "response": "C"})),
            "B"
        );
    }

    #[test]
    fn response_is_the_last_named_field() {
        assert_eq!(normalize_reply(&json!({"response": "C"})), "C");
    }

    #[test]
    fn bare_string_body_passes_through() {
        assert_eq!(normalize_reply(&json!("hello")), "hello");
    }

    #[test]
    fn anything_else_serializes_generically() {
        let normalized = normalize_reply(&json!({}));
        assert!(!normalized.is_empty());

        let normalized = normalize_reply(&json!({"itinerary": {"days": 3}}));
        assert!(normalized.contains("itinerary"));
    }

    #[test]
    fn empty_string_fields_fall_through() {
        assert_eq!(normalize_reply(&json!({"output": "", "text": "B"})), "B");
    }

    #[test]
    fn non_string_fields_fall_through() {
        assert_eq!(
            normalize_reply(&json!({"output": 42, "text": "B"})),
            "B"
        );
    }

    #[test]
    fn completion_markers_trigger() {
        assert!(is_trip_complete("Here is your Itinerary for Bali"));
        assert!(is_trip_complete("TOTAL: $2,310"));
        assert!(is_trip_complete("Bon voyage \u{2708}\u{fe0f}"));
        assert!(!is_trip_complete("Still comparing flight options."));
    }
}
