use std::fmt;

use super::InputError;

/// Non-blank text a roast is selected for. Keeps the caller's casing and spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: impl Into<String>) -> Result<Self, InputError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InputError::EmptyText);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_string_when_parsing_then_rejected() {
        assert_eq!(Topic::parse(""), Err(InputError::EmptyText));
    }

    #[test]
    fn given_whitespace_when_parsing_then_rejected() {
        assert_eq!(Topic::parse(" \t\n"), Err(InputError::EmptyText));
    }

    #[test]
    fn given_mixed_case_text_when_parsing_then_original_is_kept() {
        let topic = Topic::parse("  My Pizza ").unwrap();
        assert_eq!(topic.as_str(), "  My Pizza ");
        assert_eq!(topic.to_lowercase(), "  my pizza ");
    }
}
