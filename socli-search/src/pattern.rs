use regex::Regex;
use std::sync::OnceLock;

/// A regex literal compiled on first use and shared for the process
/// lifetime. An invalid pattern never matches.
pub(crate) struct StaticPattern {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl StaticPattern {
    pub(crate) const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        self.compiled
            .get_or_init(|| match Regex::new(self.source) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!(pattern = self.source, error = %e, "pattern.invalid");
                    None
                }
            })
            .as_ref()
            .is_some_and(|re| re.is_match(haystack))
    }
}
