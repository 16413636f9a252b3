//! Common types shared across the socli crates.
//!
//! This crate holds the pieces every other crate needs without pulling in
//! HTTP or terminal dependencies:
//!
//! - [`Provider`]: which search source produced a result list
//! - [`SocliError`] and [`Result`]: the user-facing error taxonomy
//! - [`observability`]: tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use socli_common::{ErrorKind, Provider, SocliError};
//!
//! assert_eq!(Provider::default(), Provider::Google);
//! assert_eq!(SocliError::NoResults.kind(), ErrorKind::Fatal);
//! assert_eq!(SocliError::NoResults.to_string(), "No results found...");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Search source for a query.
///
/// The two providers hand back differently shaped result links: native
/// results carry site-relative paths, search-engine results carry absolute
/// URLs. Callers keep the provider next to any result list they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Site-restricted query through the external search engine.
    #[default]
    Google,
    /// The Q&A site's own search page.
    #[serde(alias = "native", alias = "so")]
    StackOverflow,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::StackOverflow => "stackoverflow",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse classification used by entry points to decide how to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The current command cannot produce output (bot defense, no results).
    Fatal,
    /// Connectivity, encoding, terminal or configuration trouble.
    Environment,
}

/// Error types surfaced to the user by socli entry points.
///
/// The `Display` text of each variant is the message printed to the user.
#[derive(thiserror::Error, Debug)]
pub enum SocliError {
    /// The provider classified us as automated traffic.
    #[error("{0}")]
    BotDefense(String),

    /// Nothing survived extraction and normalization.
    #[error("No results found...")]
    NoResults,

    /// Manual-index mode asked for a result past the end of the list.
    #[error("No results found...")]
    IndexOutOfRange { index: usize, available: usize },

    /// A page was fetched but did not have the expected structure.
    #[error("Could not read the page: {0}")]
    Markup(String),

    #[error("Please check your internet connectivity...")]
    Connectivity(String),

    #[error("Encoding error: Use \"chcp 65001\" command before using socli...")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl SocliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BotDefense(_) | Self::NoResults | Self::IndexOutOfRange { .. } | Self::Markup(_) => {
                ErrorKind::Fatal
            }
            Self::Connectivity(_) | Self::Encoding(_) | Self::Config(_) | Self::Terminal(_) => {
                ErrorKind::Environment
            }
        }
    }

    /// Process exit status for an entry point that stops on this error.
    ///
    /// "No results" style endings exit cleanly; only an explicit index miss
    /// and local setup failures report a non-zero status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::IndexOutOfRange { .. } | Self::Terminal(_) => 1,
            Self::Config(_) => 2,
            _ => 0,
        }
    }
}

/// Convenient alias for results that use [`SocliError`].
pub type Result<T> = std::result::Result<T, SocliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_aliases() {
        let p: Provider = serde_json::from_str("\"so\"").unwrap();
        assert_eq!(p, Provider::StackOverflow);
        let p: Provider = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(p, Provider::Google);
    }

    #[test]
    fn exit_codes_follow_call_site_convention() {
        assert_eq!(SocliError::NoResults.exit_code(), 0);
        assert_eq!(SocliError::BotDefense("x".into()).exit_code(), 0);
        assert_eq!(
            SocliError::IndexOutOfRange {
                index: 12,
                available: 3
            }
            .exit_code(),
            1
        );
        assert_eq!(SocliError::Config("bad".into()).kind(), ErrorKind::Environment);
    }
}
