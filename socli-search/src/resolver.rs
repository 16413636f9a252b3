use crate::endpoints::Endpoints;
use crate::extract::ListingExtractor;
use crate::fetch::{PageFetcher, RetryPolicy, fetch_listing};
use crate::selectors::Selectors;
use crate::{ResultList, SearchError};
use socli_common::Provider;
use socli_http::UserAgentPool;
use std::sync::Arc;

/// Turns a query into a capped, ordered [`ResultList`] for either provider.
///
/// The identity pool and compiled selectors are built once at startup and
/// only read from here on.
#[derive(Clone)]
pub struct SearchResolver {
    fetcher: Arc<dyn PageFetcher>,
    pool: UserAgentPool,
    selectors: Arc<Selectors>,
    endpoints: Endpoints,
    policy: RetryPolicy,
}

impl SearchResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pool: UserAgentPool, selectors: Arc<Selectors>) -> Self {
        Self {
            fetcher,
            pool,
            selectors,
            endpoints: Endpoints::default(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search `provider` for `query` and return at most `cap` records.
    ///
    /// Fails with [`SearchError::BotDefense`] as soon as a block is seen and
    /// with [`SearchError::NoResults`] when nothing survives extraction.
    pub async fn resolve(
        &self,
        provider: Provider,
        query: &str,
        cap: usize,
    ) -> Result<ResultList, SearchError> {
        let url = self.endpoints.search_url(provider);
        let q = Endpoints::search_query(provider, query);
        tracing::info!(%provider, query, cap, "search.resolve.start");

        let entries = fetch_listing(
            self.fetcher.as_ref(),
            &self.pool,
            &self.selectors,
            provider,
            url,
            &[("q", q)],
            self.policy,
        )
        .await?;

        let scanned = entries.len();
        let records = ListingExtractor::for_provider(provider).scan(entries, cap);
        tracing::info!(%provider, scanned, kept = records.len(), "search.resolve.done");
        if records.is_empty() {
            return Err(SearchError::NoResults);
        }

        Ok(ResultList {
            provider,
            site: self.endpoints.site.clone(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedFetcher;
    use std::time::Duration;

    const ENGINE: &str = "https://www.google.com/search";

    fn engine_block(href: &str, description: &str) -> String {
        format!(
            r#"<div class="g"><h3>Title</h3><a href="{href}">x</a><div class="VwiC3b">{description}</div></div>"#
        )
    }

    fn resolver(fetcher: Arc<ScriptedFetcher>) -> SearchResolver {
        SearchResolver::new(
            fetcher,
            UserAgentPool::builtin(),
            Arc::new(Selectors::compile().unwrap()),
        )
        .with_policy(RetryPolicy::new(2, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn engine_query_is_site_restricted_and_capped() {
        let body: String = (1..=12)
            .map(|i| engine_block(&format!("/url?q=https://stackoverflow.com/questions/{i}/q&sa=U"), "d"))
            .collect();
        let fetcher = Arc::new(ScriptedFetcher::new().then(ENGINE, 200, &body));
        let list = resolver(fetcher.clone())
            .resolve(Provider::Google, "tokio select", 10)
            .await
            .unwrap();

        assert_eq!(list.len(), 10);
        assert_eq!(list.provider, Provider::Google);
        assert_eq!(
            list.content_url(9).as_deref(),
            Some("https://stackoverflow.com/questions/10/q")
        );
        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].0, ENGINE);
        assert_eq!(seen[0].1[0].1, "site:www.stackoverflow.com tokio select");
    }

    #[tokio::test]
    async fn only_rejected_candidates_is_no_results_without_retry() {
        let body = [
            engine_block("/url?q=https://example.com/post&sa=U", "ad"),
            engine_block("/url?q=https://stackoverflow.com/questions/5/x&sa=U", ""),
        ]
        .concat();
        let fetcher = Arc::new(ScriptedFetcher::new().then(ENGINE, 200, &body));
        let err = resolver(fetcher.clone())
            .resolve(Provider::Google, "q", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NoResults));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn engine_block_yields_no_list() {
        let fetcher = Arc::new(ScriptedFetcher::new().then(
            "https://ipv4.google.com/sorry/index?continue=x",
            429,
            "",
        ));
        let err = resolver(fetcher)
            .resolve(Provider::Google, "q", 10)
            .await
            .unwrap_err();
        match err {
            SearchError::BotDefense(hit) => assert_eq!(hit.provider, Provider::Google),
            other => panic!("expected bot defense, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn native_results_keep_relative_targets() {
        let body = r#"
            <div class="s-post-summary">
              <a class="s-link" href="/questions/7/seven">Seven</a>
              <div class="s-post-summary--content-excerpt">excerpt</div>
              <a class="s-tag" href="/tags/rust">rust</a>
            </div>"#;
        let fetcher = Arc::new(ScriptedFetcher::new().then(
            "https://stackoverflow.com/search?q=seven",
            200,
            body,
        ));
        let list = resolver(fetcher)
            .resolve(Provider::StackOverflow, "seven", 10)
            .await
            .unwrap();
        assert_eq!(list.records[0].target_ref, "/questions/7/seven");
        assert_eq!(list.records[0].tags, vec!["rust"]);
        assert_eq!(
            list.content_url(0).as_deref(),
            Some("https://stackoverflow.com/questions/7/seven")
        );
    }
}
