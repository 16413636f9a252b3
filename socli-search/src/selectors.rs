//! Every CSS selector socli depends on, in one place.
//!
//! Upstream markup changes without notice. When a listing or question page
//! stops parsing, this file is the only one that should need an edit.

use crate::SearchError;
use scraper::Selector;

/// Native search: one block per hit.
pub const RESULT_CONTAINER: &str = "div.question-summary, div.s-post-summary";
/// Native search: the question title link inside a hit.
pub const RESULT_TITLE_LINK: &str = "h3 a, a.question-hyperlink, a.s-link";
/// Native search: the excerpt under the title.
pub const RESULT_EXCERPT: &str = ".excerpt, .s-post-summary--content-excerpt";
/// Native search: tag labels.
pub const RESULT_TAG: &str = "a.post-tag, a.s-tag";

/// Search engine: one block per organic hit.
pub const ENGINE_RESULT: &str = "div.g";
pub const ENGINE_TITLE: &str = "h3";
pub const ENGINE_DESCRIPTION: &str = "div.VwiC3b, span.st, div.s span, div[data-sncf]";
pub const ENGINE_LINK: &str = "a[href]";

/// Question page.
pub const QUESTION_TITLE: &str = "h1 a.question-hyperlink, a.question-hyperlink, #question-header h1";
pub const VOTE_COUNT: &str = "div.js-vote-count";
pub const QUESTION_STATS: &str = "div.module.question-stats";
/// Question body first, then one block per answer.
pub const POST_BODY: &str = "div.post-text, div.s-prose.js-post-body";

pub const ANY_LINK: &str = "a";

/// Compiled form of the selectors above. Build once and share.
#[derive(Debug)]
pub struct Selectors {
    pub result_container: Selector,
    pub result_title_link: Selector,
    pub result_excerpt: Selector,
    pub result_tag: Selector,
    pub engine_result: Selector,
    pub engine_title: Selector,
    pub engine_description: Selector,
    pub engine_link: Selector,
    pub question_title: Selector,
    pub vote_count: Selector,
    pub question_stats: Selector,
    pub post_body: Selector,
    pub any_link: Selector,
}

impl Selectors {
    pub fn compile() -> Result<Self, SearchError> {
        Ok(Self {
            result_container: parse(RESULT_CONTAINER)?,
            result_title_link: parse(RESULT_TITLE_LINK)?,
            result_excerpt: parse(RESULT_EXCERPT)?,
            result_tag: parse(RESULT_TAG)?,
            engine_result: parse(ENGINE_RESULT)?,
            engine_title: parse(ENGINE_TITLE)?,
            engine_description: parse(ENGINE_DESCRIPTION)?,
            engine_link: parse(ENGINE_LINK)?,
            question_title: parse(QUESTION_TITLE)?,
            vote_count: parse(VOTE_COUNT)?,
            question_stats: parse(QUESTION_STATS)?,
            post_body: parse(POST_BODY)?,
            any_link: parse(ANY_LINK)?,
        })
    }
}

fn parse(css: &'static str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Selector {
        selector: css,
        message: format!("{e:?}"),
    })
}
