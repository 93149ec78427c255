//! Dedup token computation.
//!
//! A token identifies "the same logical crash" across the several host
//! interception points that can fire for it. Two callbacks with the same
//! pid, user id and process name share a token.

use std::fmt;

/// Composite key `"<pid>|<userId>|<processName>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupToken(String);

impl DedupToken {
    /// Compute a token from crash identity fields.
    pub fn new(pid: i32, user_id: i32, process_name: &str) -> Self {
        DedupToken(format!("{}|{}|{}", pid, user_id, process_name))
    }

    /// Get the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DedupToken {
    fn from(raw: &str) -> Self {
        DedupToken(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = DedupToken::new(100, 0, "com.example");
        assert_eq!(token.as_str(), "100|0|com.example");
        assert_eq!(token.to_string(), "100|0|com.example");
    }

    #[test]
    fn test_same_identity_same_token() {
        assert_eq!(
            DedupToken::new(1, 0, "system"),
            DedupToken::new(1, 0, "system")
        );
    }

    #[test]
    fn test_each_field_distinguishes() {
        let base = DedupToken::new(1, 0, "a");
        assert_ne!(base, DedupToken::new(2, 0, "a"));
        assert_ne!(base, DedupToken::new(1, 10, "a"));
        assert_ne!(base, DedupToken::new(1, 0, "b"));
    }

    #[test]
    fn test_empty_process_name() {
        let token = DedupToken::new(0, 0, "");
        assert_eq!(token.as_str(), "0|0|");
    }
}
