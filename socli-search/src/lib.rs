//! Search resolution and question loading for socli.
//!
//! - [`defense`]: bot-defense detection on response URLs
//! - [`normalize`]: search-engine href → canonical content URL
//! - [`selectors`] and [`dom`]: the document query boundary
//! - [`extract`]: provider-specific listing extraction behind one scan loop
//! - [`fetch`]: fetch-with-retry over a [`fetch::PageFetcher`]
//! - [`resolver`]: one `resolve` call per provider
//! - [`question`]: single question page → [`QuestionView`]

use socli_common::{ErrorKind, Provider, SocliError};
use socli_http::HttpError;

pub mod defense;
pub mod dom;
pub mod endpoints;
pub mod extract;
pub mod fetch;
pub mod normalize;
mod pattern;
pub mod question;
pub mod resolver;
pub mod selectors;

pub use defense::BotDefense;
pub use endpoints::Endpoints;
pub use extract::{Candidate, ListingExtractor, RejectReason};
pub use fetch::{PageFetcher, PageRequest, RetryPolicy};
pub use question::{QuestionLoader, SiteQuestionLoader};
pub use resolver::SearchResolver;
pub use selectors::Selectors;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub title: String,
    pub summary: String,
    /// Site-relative path for native results, absolute URL for search-engine
    /// results. Read it through [`ResultList::content_url`].
    pub target_ref: String,
    /// Tag labels. Empty for search-engine results.
    pub tags: Vec<String>,
}

/// Results in provider relevance order, tagged with the provider that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultList {
    pub provider: Provider,
    /// Origin that native relative paths are joined onto.
    pub site: String,
    pub records: Vec<ResultRecord>,
}

impl ResultList {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Absolute URL of the record at `index`, whatever the provider.
    pub fn content_url(&self, index: usize) -> Option<String> {
        let record = self.records.get(index)?;
        Some(match self.provider {
            Provider::StackOverflow if !record.target_ref.starts_with("http") => format!(
                "{}/{}",
                self.site.trim_end_matches('/'),
                record.target_ref.trim_start_matches('/')
            ),
            _ => record.target_ref.clone(),
        })
    }
}

/// A loaded question thread.
///
/// `answers` is never empty: a page without answers yields one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub url: String,
    pub title: String,
    pub body: String,
    pub stats: String,
    pub answers: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("{}", .0.message())]
    BotDefense(BotDefense),

    #[error("No results found...")]
    NoResults,

    #[error("page has no {0}")]
    MissingContent(&'static str),

    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BotDefense(_)
            | Self::NoResults
            | Self::MissingContent(_)
            | Self::Selector { .. }
            | Self::Status { .. } => ErrorKind::Fatal,
            Self::Http(_) => ErrorKind::Environment,
        }
    }
}

impl From<SearchError> for SocliError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::BotDefense(hit) => SocliError::BotDefense(hit.message().to_string()),
            SearchError::NoResults => SocliError::NoResults,
            SearchError::MissingContent(_)
            | SearchError::Selector { .. }
            | SearchError::Status { .. } => SocliError::Markup(err.to_string()),
            SearchError::Http(http) => match http {
                HttpError::Network(m) => SocliError::Connectivity(m),
                HttpError::Server { .. } => SocliError::Connectivity(http.to_string()),
                HttpError::Decode(m) => SocliError::Encoding(m),
                HttpError::Url(m) | HttpError::Build(m) => SocliError::Config(m),
            },
        }
    }
}
