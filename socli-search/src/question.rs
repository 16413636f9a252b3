//! Question page loading.

use crate::defense;
use crate::dom::{Document, collapse_whitespace};
use crate::fetch::{PageFetcher, PageRequest};
use crate::selectors::Selectors;
use crate::{QuestionView, SearchError};
use async_trait::async_trait;
use socli_common::Provider;
use socli_http::UserAgentPool;
use std::sync::Arc;

/// Substituted when a question has no answers.
pub const NO_ANSWERS: &str = "No answers for this question ...";
/// Shown instead of statistics when the page lacks them.
pub const STATS_UNAVAILABLE: &str = "Could not load statistics.";

const STATS_COLUMN_GAP: &str = "     ";

#[async_trait]
pub trait QuestionLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<QuestionView, SearchError>;
}

/// Loads question pages from the live site.
#[derive(Clone)]
pub struct SiteQuestionLoader {
    fetcher: Arc<dyn PageFetcher>,
    pool: UserAgentPool,
    selectors: Arc<Selectors>,
}

impl SiteQuestionLoader {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pool: UserAgentPool, selectors: Arc<Selectors>) -> Self {
        Self {
            fetcher,
            pool,
            selectors,
        }
    }
}

#[async_trait]
impl QuestionLoader for SiteQuestionLoader {
    async fn load(&self, url: &str) -> Result<QuestionView, SearchError> {
        tracing::info!(url, "question.load.start");
        let page = self
            .fetcher
            .fetch(PageRequest {
                url,
                query: Vec::new(),
                identity: self.pool.pick(),
            })
            .await?;

        // Question pages always live on the site itself.
        if let Some(hit) = defense::detect(page.url.as_str(), Provider::StackOverflow) {
            return Err(SearchError::BotDefense(hit));
        }
        if !page.status.is_success() {
            return Err(SearchError::Status {
                status: page.status.as_u16(),
                url: page.url.to_string(),
            });
        }

        let view = parse_question(url, &page.body, &self.selectors)?;
        tracing::info!(url, answers = view.answers.len(), "question.load.done");
        Ok(view)
    }
}

/// Extract a [`QuestionView`] from question page markup.
///
/// Only a missing question body is an error. A missing title is left empty,
/// missing statistics fall back to [`STATS_UNAVAILABLE`] and a page without
/// answers gets the [`NO_ANSWERS`] placeholder.
pub fn parse_question(url: &str, html: &str, selectors: &Selectors) -> Result<QuestionView, SearchError> {
    let doc = Document::parse(html);

    let title = match doc.find_first(&selectors.question_title) {
        Some(h) => h.clean_text(),
        None => {
            tracing::warn!(url, "question.title.missing");
            String::new()
        }
    };

    let votes = doc.find_first(&selectors.vote_count).map(|v| v.clean_text());
    let block = doc.find_first(&selectors.question_stats).map(|s| s.text());
    let stats = match (votes, block) {
        (Some(votes), Some(block)) => format_stats(&votes, &block),
        _ => STATS_UNAVAILABLE.to_string(),
    };

    let mut posts = doc
        .find_all(&selectors.post_body)
        .into_iter()
        .map(|post| post.text_with_links().trim().to_string());
    let body = posts.next().ok_or(SearchError::MissingContent("question body"))?;
    let mut answers: Vec<String> = posts.collect();
    if answers.is_empty() {
        answers.push(NO_ANSWERS.to_string());
    }

    Ok(QuestionView {
        url: url.to_string(),
        title,
        body,
        stats,
        answers,
    })
}

fn format_stats(votes: &str, block: &str) -> String {
    let flattened = block.replace('\n', " ").replace(STATS_COLUMN_GAP, " | ");
    collapse_whitespace(&format!("Votes {votes} | {flattened}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedFetcher;

    const URL: &str = "https://stackoverflow.com/questions/42/how-to-iterate";

    const FULL_PAGE: &str = r#"
        <div id="question-header"><h1><a class="question-hyperlink" href="/questions/42">How   to iterate?</a></h1></div>
        <div class="js-vote-count">17</div>
        <div class="module question-stats">asked
     today
viewed 12 times</div>
        <div class="post-text"><p>See <a href="https://doc.rust-lang.org/std/iter/">iter docs</a>.</p></div>
        <div class="post-text"><p>Use <code>for x in v</code>, as in <a href="/a/1">this</a>.</p></div>
        <div class="post-text"><p>Or iterators.</p></div>
    "#;

    fn selectors() -> Selectors {
        Selectors::compile().unwrap()
    }

    #[test]
    fn full_page_is_split_into_body_and_answers() {
        let view = parse_question(URL, FULL_PAGE, &selectors()).unwrap();
        assert_eq!(view.url, URL);
        assert_eq!(view.title, "How to iterate?");
        assert_eq!(view.body, "See iter docs [https://doc.rust-lang.org/std/iter/].");
        assert_eq!(view.answers.len(), 2);
        assert_eq!(view.answers[0], "Use for x in v, as in this [/a/1].");
        assert_eq!(view.answers[1], "Or iterators.");
    }

    #[test]
    fn stats_block_is_flattened() {
        let view = parse_question(URL, FULL_PAGE, &selectors()).unwrap();
        assert!(view.stats.starts_with("Votes 17 | asked"), "{}", view.stats);
        assert!(view.stats.contains("| today"), "{}", view.stats);
        assert!(view.stats.ends_with("viewed 12 times"), "{}", view.stats);
        assert!(!view.stats.contains('\n'));
    }

    #[test]
    fn unanswered_question_gets_placeholder_and_stats_fallback() {
        let page = r#"
            <a class="question-hyperlink" href="/questions/9">Lonely</a>
            <div class="s-prose js-post-body">Nobody answered.</div>"#;
        let view = parse_question(URL, page, &selectors()).unwrap();
        assert_eq!(view.title, "Lonely");
        assert_eq!(view.answers, vec![NO_ANSWERS.to_string()]);
        assert_eq!(view.stats, STATS_UNAVAILABLE);
    }

    #[test]
    fn page_without_posts_is_an_error() {
        let err = parse_question(URL, "<html><body>gone</body></html>", &selectors()).unwrap_err();
        assert!(matches!(err, SearchError::MissingContent(_)));
    }

    fn loader(fetcher: Arc<ScriptedFetcher>) -> SiteQuestionLoader {
        SiteQuestionLoader::new(
            fetcher,
            UserAgentPool::builtin(),
            Arc::new(selectors()),
        )
    }

    #[tokio::test]
    async fn loader_fetches_and_parses() {
        let fetcher = Arc::new(ScriptedFetcher::new().then(URL, 200, FULL_PAGE));
        let view = loader(fetcher.clone()).load(URL).await.unwrap();
        assert_eq!(view.answers.len(), 2);
        assert_eq!(fetcher.seen.lock().unwrap()[0].0, URL);
    }

    #[tokio::test]
    async fn captcha_redirect_stops_loading() {
        let fetcher = Arc::new(ScriptedFetcher::new().then(
            "https://stackoverflow.com/nocaptcha?s=42",
            200,
            FULL_PAGE,
        ));
        let err = loader(fetcher).load(URL).await.unwrap_err();
        assert!(matches!(err, SearchError::BotDefense(_)));
    }

    #[tokio::test]
    async fn missing_question_is_a_status_error() {
        let fetcher = Arc::new(ScriptedFetcher::new().then(URL, 404, "<html></html>"));
        let err = loader(fetcher).load(URL).await.unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 404, .. }));
    }
}
