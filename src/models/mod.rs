//! Data models for Mediatheque

pub mod dates;
pub mod document;
pub mod loan;
pub mod subscriber;

// Re-export commonly used types
pub use document::Document;
pub use loan::Loan;
pub use subscriber::Subscriber;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// Free-text search over a collection
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring to look for
    pub q: Option<String>,
}

impl SearchQuery {
    /// SQL `ILIKE` pattern for the search term, `None` when no filtering applies.
    ///
    /// Wildcards in the term match literally; queries use `ESCAPE '\'`.
    pub fn pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| {
                let escaped = q
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

/// Explicit confirmation for destructive operations
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct Confirmation {
    /// Must be `true` to proceed
    pub confirm: Option<bool>,
}

impl Confirmation {
    pub fn require(&self, action: &str) -> AppResult<()> {
        if self.confirm == Some(true) {
            Ok(())
        } else {
            Err(AppError::ConfirmationRequired(format!(
                "{} requires confirm=true",
                action
            )))
        }
    }
}

/// Generate a new opaque record identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern() {
        assert_eq!(SearchQuery { q: None }.pattern(), None);
        assert_eq!(SearchQuery { q: Some("  ".into()) }.pattern(), None);
        assert_eq!(
            SearchQuery { q: Some(" dune ".into()) }.pattern(),
            Some("%dune%".to_string())
        );
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(
            SearchQuery { q: Some("50%".into()) }.pattern(),
            Some(r"%50\%%".to_string())
        );
        assert_eq!(
            SearchQuery { q: Some(r"a_b\c".into()) }.pattern(),
            Some(r"%a\_b\\c%".to_string())
        );
    }

    #[test]
    fn test_confirmation() {
        assert!(Confirmation { confirm: Some(true) }.require("Delete").is_ok());
        assert!(matches!(
            Confirmation { confirm: Some(false) }.require("Delete"),
            Err(AppError::ConfirmationRequired(_))
        ));
        assert!(Confirmation::default().require("Delete").is_err());
    }
}
