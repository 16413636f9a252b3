//! Search-engine href → canonical content URL.
//!
//! Search-engine result anchors come wrapped in redirect prefixes and carry
//! analytics parameters. [`normalize`] peels those off and keeps only URLs
//! that point at a question thread or an answer; everything else (ads,
//! instant-answer cards, other domains) is rejected. Rejection means "drop
//! this candidate", never a failure of the search.
//!
//! `normalize` is idempotent: feeding its output back in returns the same
//! string.

use crate::pattern::StaticPattern;

const TRACKING_MARKER: &str = "&sa=";
const REDIRECT_PREFIX: &str = "/url?q=";
const QUALIFIED_REDIRECT_PREFIX: &str = "http://www.google.com/url?url=";
const DOUBLE_WRAPPED_PREFIX: &str = "https:///url?url=";
const SECURE_SCHEME: &str = "https://";

static QUESTION_SHAPE: StaticPattern = StaticPattern::new(r"/questions/[0-9]+");
static ANSWER_SHAPE: StaticPattern = StaticPattern::new(r"\.com/a/[0-9]+");

/// Turn a raw anchor href into a canonical content URL, or `None`.
///
/// ```
/// use socli_search::normalize::normalize;
///
/// assert_eq!(
///     normalize("/url?q=https://stackoverflow.com/questions/123/title&sa=U").as_deref(),
///     Some("https://stackoverflow.com/questions/123/title"),
/// );
/// assert_eq!(normalize("https://example.com/blog/rust"), None);
/// ```
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = strip_tracking(raw.trim()).trim_end();
    let url = with_scheme(strip_wrappers(trimmed).trim_start());
    if !is_content_url(&url) {
        tracing::trace!(href = raw, "normalize.rejected");
        return None;
    }
    Some(resolve_double_wrap(url))
}

/// True when the URL has a question-thread or answer path shape.
pub fn is_content_url(url: &str) -> bool {
    QUESTION_SHAPE.is_match(url) || ANSWER_SHAPE.is_match(url)
}

fn strip_tracking(url: &str) -> &str {
    match url.find(TRACKING_MARKER) {
        Some(at) => &url[..at],
        None => url,
    }
}

fn strip_wrappers(mut url: &str) -> &str {
    loop {
        match url
            .strip_prefix(REDIRECT_PREFIX)
            .or_else(|| url.strip_prefix(QUALIFIED_REDIRECT_PREFIX))
        {
            Some(rest) => url = rest,
            None => return url,
        }
    }
}

fn with_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{SECURE_SCHEME}{url}")
    }
}

// "/url?url=..." left over after a scheme was prepended.
fn resolve_double_wrap(url: String) -> String {
    match url.strip_prefix(DOUBLE_WRAPPED_PREFIX) {
        Some(rest) => resolve_double_wrap(with_scheme(strip_wrappers(rest))),
        None => url,
    }
}
