//! Fetch-with-retry.
//!
//! One attempt is: pick a request identity, GET the page, check the final
//! URL for bot defense, then run the listing extractor. Bot defense ends the
//! operation at once. An empty extraction is treated as transient and the
//! whole attempt is repeated after a fixed delay until the budget runs out.

use crate::defense;
use crate::dom::Document;
use crate::extract::{ListingExtractor, RawEntry};
use crate::selectors::Selectors;
use crate::SearchError;
use async_trait::async_trait;
use socli_common::Provider;
use socli_http::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use socli_http::{FetchedPage, HttpClient, RequestIdentity, RequestOpts, UserAgentPool};
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::sleep;

const ACCEPT_HTML: &str = "text/html";
/// Page text (stats labels, answer markers) is matched in English.
const CONTENT_LANGUAGE: &str = "en-US";

/// One outbound GET.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub url: &'a str,
    pub query: Vec<(&'a str, String)>,
    pub identity: RequestIdentity,
}

/// Anything that can fetch an HTML page. Implemented for [`HttpClient`];
/// tests substitute scripted fakes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: PageRequest<'_>) -> Result<FetchedPage, SearchError>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, request: PageRequest<'_>) -> Result<FetchedPage, SearchError> {
        let query = request
            .query
            .iter()
            .map(|(k, v)| (*k, Cow::Borrowed(v.as_str())))
            .collect();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(CONTENT_LANGUAGE));
        let opts = RequestOpts {
            headers: Some(headers),
            user_agent: Some(request.identity.user_agent.as_str()),
            query: Some(query),
            ..Default::default()
        };
        Ok(self.get_page(request.url, opts).await?)
    }
}

/// Bounds for repeating a fetch whose page had no result containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Fetch a listing page and extract its raw entries, retrying empty
/// extractions. Returns [`SearchError::NoResults`] once the budget is spent.
pub async fn fetch_listing(
    fetcher: &dyn PageFetcher,
    pool: &UserAgentPool,
    selectors: &Selectors,
    provider: Provider,
    url: &str,
    query: &[(&str, String)],
    policy: RetryPolicy,
) -> Result<Vec<RawEntry>, SearchError> {
    let extractor = ListingExtractor::for_provider(provider);
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        let identity = pool.pick();
        tracing::debug!(
            %provider,
            attempt,
            attempts,
            user_agent = %identity.user_agent,
            "search.fetch.attempt"
        );
        let page = fetcher
            .fetch(PageRequest {
                url,
                query: query.to_vec(),
                identity,
            })
            .await?;

        if let Some(hit) = defense::detect(page.url.as_str(), provider) {
            return Err(SearchError::BotDefense(hit));
        }

        let entries = if page.status.is_success() {
            extract_entries(extractor, &page.body, selectors)
        } else {
            tracing::warn!(%provider, status = page.status.as_u16(), url = %page.url, "search.fetch.status");
            Vec::new()
        };
        if !entries.is_empty() {
            tracing::debug!(%provider, attempt, entries = entries.len(), "search.extract.ok");
            return Ok(entries);
        }

        tracing::info!(%provider, attempt, attempts, "search.extract.empty");
        if attempt < attempts {
            sleep(policy.delay).await;
        }
    }

    Err(SearchError::NoResults)
}

// Keeps the parsed document out of the async state machine.
fn extract_entries(extractor: ListingExtractor, body: &str, selectors: &Selectors) -> Vec<RawEntry> {
    let doc = Document::parse(body);
    extractor.extract(&doc, selectors)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedFetcher;
    use super::*;

    const LISTING: &str = r#"<div class="question-summary"><h3><a href="/questions/1/a">A</a></h3></div>"#;
    const SEARCH: &str = "https://stackoverflow.com/search";

    fn fast(attempts: usize) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    async fn run(fetcher: &ScriptedFetcher, attempts: usize) -> Result<Vec<RawEntry>, SearchError> {
        let selectors = Selectors::compile().unwrap();
        let pool = UserAgentPool::builtin();
        fetch_listing(
            fetcher,
            &pool,
            &selectors,
            Provider::StackOverflow,
            SEARCH,
            &[("q", "rust".to_string())],
            fast(attempts),
        )
        .await
    }

    #[tokio::test]
    async fn empty_pages_are_retried_until_content_appears() {
        let fetcher = ScriptedFetcher::new()
            .then(SEARCH, 200, "<html></html>")
            .then(SEARCH, 200, "<html><body>still nothing</body></html>")
            .then(SEARCH, 200, LISTING);
        let entries = run(&fetcher, 3).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_is_no_results() {
        let fetcher = ScriptedFetcher::new()
            .then(SEARCH, 200, "<html></html>")
            .then(SEARCH, 503, LISTING);
        let err = run(&fetcher, 2).await.unwrap_err();
        assert!(matches!(err, SearchError::NoResults));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn bot_defense_is_not_retried() {
        let fetcher = ScriptedFetcher::new()
            .then("https://stackoverflow.com/nocaptcha?s=1", 200, "<html></html>")
            .then(SEARCH, 200, LISTING);
        let err = run(&fetcher, 3).await.unwrap_err();
        assert!(matches!(err, SearchError::BotDefense(_)));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn every_attempt_carries_an_identity_from_the_pool() {
        let fetcher = ScriptedFetcher::new()
            .then(SEARCH, 200, "<html></html>")
            .then(SEARCH, 200, LISTING);
        run(&fetcher, 3).await.unwrap();
        let pool = UserAgentPool::builtin();
        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for (url, query, agent) in seen.iter() {
            assert_eq!(url, SEARCH);
            assert_eq!(query, &vec![("q".to_string(), "rust".to_string())]);
            assert!(pool.contains(agent));
        }
    }
}
