//! Bot-defense detection on response URLs.
//!
//! Both providers signal "you look automated" by redirecting to a
//! well-known location, so the final URL of a response is enough to tell.

use crate::pattern::StaticPattern;
use socli_common::Provider;

static NATIVE_CHALLENGE: StaticPattern = StaticPattern::new(r"\.com/nocaptcha");
static ENGINE_TRAFFIC_BLOCK: StaticPattern = StaticPattern::new(r"ipv4\.google\.com/sorry");

const NATIVE_MESSAGE: &str =
    "StackOverflow captcha check triggered. Please wait a few seconds before trying again.";
const ENGINE_MESSAGE: &str = "Google thinks you're a bot because you're issuing too many queries too quickly! \
Now you'll have to wait about an hour before you're unblocked... :(. \
Use the -s tag to search via Stack Overflow instead.";

/// A detected block. Fatal to the current operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotDefense {
    pub provider: Provider,
    pub url: String,
}

impl BotDefense {
    /// Explanation shown to the user.
    pub fn message(&self) -> &'static str {
        match self.provider {
            Provider::StackOverflow => NATIVE_MESSAGE,
            Provider::Google => ENGINE_MESSAGE,
        }
    }
}

/// Check a response URL against the provider's block pattern.
pub fn detect(response_url: &str, provider: Provider) -> Option<BotDefense> {
    let blocked = match provider {
        Provider::StackOverflow => NATIVE_CHALLENGE.is_match(response_url),
        Provider::Google => ENGINE_TRAFFIC_BLOCK.is_match(response_url),
    };
    blocked.then(|| {
        tracing::warn!(%provider, url = response_url, "search.bot_defense");
        BotDefense {
            provider,
            url: response_url.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_challenge_is_detected() {
        let hit = detect(
            "https://stackoverflow.com/nocaptcha?s=abc",
            Provider::StackOverflow,
        )
        .unwrap();
        assert_eq!(hit.provider, Provider::StackOverflow);
        assert!(hit.message().contains("captcha check"));
    }

    #[test]
    fn engine_block_is_detected() {
        let url = "https://ipv4.google.com/sorry/index?continue=https://www.google.com/search";
        let hit = detect(url, Provider::Google).unwrap();
        assert!(hit.message().starts_with("Google thinks you're a bot"));
        assert_eq!(hit.url, url);
    }

    #[test]
    fn patterns_are_provider_specific() {
        assert!(detect("https://ipv4.google.com/sorry/index", Provider::StackOverflow).is_none());
        assert!(detect("https://stackoverflow.com/nocaptcha", Provider::Google).is_none());
    }

    #[test]
    fn ordinary_pages_pass() {
        assert!(detect("https://stackoverflow.com/search?q=rust", Provider::StackOverflow).is_none());
        assert!(detect("https://www.google.com/search?q=site:www.stackoverflow.com+rust", Provider::Google).is_none());
    }
}
