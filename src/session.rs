use std::fmt;

use uuid::Uuid;

/// Opaque correlation token sent with every webhook call so the remote
/// workflow can keep per-conversation context. Generated once per client
/// start, never regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading segment of the token, for compact header display.
    pub fn short(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn short_form_is_a_prefix() {
        let id = SessionId::generate();
        assert!(id.as_str().starts_with(id.short()));
        assert_eq!(id.short().len(), 8);
    }
}
