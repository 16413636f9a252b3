use socli_common::Provider;

const SITE: &str = "https://stackoverflow.com";
const NATIVE_SEARCH_PATH: &str = "/search";
const ENGINE_SEARCH: &str = "https://www.google.com/search";
const ENGINE_SITE_FILTER: &str = "site:www.stackoverflow.com";

/// Where each provider's search lives. Overridable so tests can point at a
/// mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub site: String,
    pub native_search: String,
    pub engine_search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            site: SITE.to_string(),
            native_search: format!("{SITE}{NATIVE_SEARCH_PATH}"),
            engine_search: ENGINE_SEARCH.to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint on one origin.
    pub fn on_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            site: origin.to_string(),
            native_search: format!("{origin}{NATIVE_SEARCH_PATH}"),
            engine_search: format!("{origin}/engine/search"),
        }
    }

    pub fn search_url(&self, provider: Provider) -> &str {
        match provider {
            Provider::StackOverflow => &self.native_search,
            Provider::Google => &self.engine_search,
        }
    }

    /// The `q` parameter sent to `provider`.
    pub fn search_query(provider: Provider, query: &str) -> String {
        match provider {
            Provider::StackOverflow => query.to_string(),
            Provider::Google => format!("{ENGINE_SITE_FILTER} {query}"),
        }
    }
}
