use crate::cli::Cli;
use anyhow::{Context, Result};
use socli_common::observability::LogConfig;
use socli_common::{Provider, SocliError};
use socli_config::{SocliConfig, SocliConfigLoader, UiMode, default_config_path};
use socli_http::{HttpClient, UserAgentPool};
use socli_search::{
    Endpoints, PageFetcher, RetryPolicy, SearchResolver, Selectors, SiteQuestionLoader,
};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

/// File settings, then environment, then command-line flags.
pub fn load_config(cli: &Cli) -> Result<SocliConfig> {
    let loader = match (&cli.config, default_config_path()) {
        (Some(path), _) => SocliConfigLoader::new().with_file(path),
        (None, Some(path)) => SocliConfigLoader::new().with_optional_file(path),
        (None, None) => SocliConfigLoader::new(),
    };
    let mut config = loader
        .load()
        .map_err(|e| SocliError::Config(e.to_string()))
        .context("loading settings")?;
    apply_flags(&mut config, cli);
    Ok(config)
}

pub fn apply_flags(config: &mut SocliConfig, cli: &Cli) {
    if cli.stackoverflow {
        config.search.provider = Provider::StackOverflow;
    }
    if let Some(browser) = &cli.browser {
        config.browser.name = Some(browser.clone());
    }
    if cli.line {
        config.ui.mode = UiMode::Line;
    }
}

pub fn log_config(config: &SocliConfig) -> LogConfig {
    LogConfig {
        log_dir: config.logging.dir.clone(),
        emit_stderr: config.logging.emit_stderr,
        format: config.logging.format,
        default_filter: config.logging.filter.clone(),
        ..LogConfig::default()
    }
}

/// Whether to use the line front end.
pub fn line_mode(mode: UiMode) -> bool {
    match mode {
        UiMode::Line => true,
        UiMode::Interactive => false,
        UiMode::Auto => cfg!(windows) || !std::io::stdout().is_terminal(),
    }
}

/// Long-lived collaborators built once per process.
pub struct Services {
    pub resolver: SearchResolver,
    pub loader: SiteQuestionLoader,
}

impl Services {
    pub fn build(config: &SocliConfig) -> Result<Self> {
        let endpoints = Endpoints::default();
        let client = HttpClient::new(&endpoints.site)
            .map_err(|e| SocliError::Config(e.to_string()))?
            .with_timeout(Duration::from_secs(config.http.timeout_secs))
            .with_retries(config.http.network_retries);

        let pool = identity_pool(config);
        let selectors = Arc::new(Selectors::compile().map_err(SocliError::from)?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(client);

        let policy = RetryPolicy::new(
            config.search.extraction_retries as usize,
            Duration::from_millis(config.search.retry_delay_ms),
        );
        let resolver = SearchResolver::new(fetcher.clone(), pool.clone(), selectors.clone())
            .with_endpoints(endpoints)
            .with_policy(policy);
        let loader = SiteQuestionLoader::new(fetcher, pool, selectors);
        Ok(Self { resolver, loader })
    }
}

fn identity_pool(config: &SocliConfig) -> UserAgentPool {
    let Some(path) = &config.identity.user_agents_file else {
        return UserAgentPool::builtin();
    };
    match UserAgentPool::from_file(path) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "identity.pool.fallback");
            UserAgentPool::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from(["socli", "-s", "--browser", "firefox", "--line", "q"]).unwrap();
        let mut config = SocliConfig::default();
        apply_flags(&mut config, &cli);
        assert_eq!(config.search.provider, Provider::StackOverflow);
        assert_eq!(config.browser.name.as_deref(), Some("firefox"));
        assert_eq!(config.ui.mode, UiMode::Line);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["socli", "q"]).unwrap();
        let mut config = SocliConfig::default();
        config.browser.name = Some("lynx".into());
        apply_flags(&mut config, &cli);
        assert_eq!(config.search.provider, Provider::Google);
        assert_eq!(config.browser.name.as_deref(), Some("lynx"));
        assert_eq!(config.ui.mode, UiMode::Auto);
    }

    #[test]
    fn explicit_modes_ignore_the_terminal() {
        assert!(line_mode(UiMode::Line));
        assert!(!line_mode(UiMode::Interactive));
    }

    #[test]
    fn unreadable_agent_file_falls_back_to_builtin() {
        let mut config = SocliConfig::default();
        config.identity.user_agents_file = Some("/nonexistent/socli/agents.txt".into());
        assert!(!identity_pool(&config).is_empty());
    }

    #[test]
    fn services_build_from_defaults() {
        assert!(Services::build(&SocliConfig::default()).is_ok());
    }
}
