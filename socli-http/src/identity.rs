//! Request identity pool.
//!
//! Every outbound fetch presents a user agent drawn uniformly from a pool
//! that is loaded once and then only read. The pool is an immutable value:
//! "reloading" builds a new pool that the owner swaps in, so readers never
//! observe a half-filled list.

use rand::prelude::SliceRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BUILTIN_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
];

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("failed to read user agents from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no user agents found in {0}")]
    Empty(String),
}

/// Identity attached to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user_agent: String,
}

/// Non-empty, shuffled, read-only list of user agents.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Arc<[String]>,
    source: Option<PathBuf>,
}

impl UserAgentPool {
    /// Pool of plausible desktop browsers.
    pub fn builtin() -> Self {
        let agents: Vec<String> = BUILTIN_AGENTS.iter().map(|s| s.to_string()).collect();
        Self::shuffled(agents, None)
    }

    /// Load a newline-separated list. Surrounding quotes are stripped;
    /// blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self, IdentityError> {
        let text = std::fs::read_to_string(path).map_err(|source| IdentityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let agents = parse_agents(&text);
        if agents.is_empty() {
            return Err(IdentityError::Empty(path.display().to_string()));
        }
        tracing::debug!(path = %path.display(), count = agents.len(), "identity.pool.loaded");
        Ok(Self::shuffled(agents, Some(path.to_path_buf())))
    }

    /// Build a fresh pool from the same source. Loading the same file twice
    /// yields the same set of agents.
    pub fn reload(&self) -> Result<Self, IdentityError> {
        match &self.source {
            Some(path) => Self::from_file(path),
            None => Ok(Self::shuffled(self.agents.to_vec(), None)),
        }
    }

    /// Draw an identity uniformly at random.
    pub fn pick(&self) -> RequestIdentity {
        let mut rng = rand::thread_rng();
        // The pool is never empty; constructors reject empty lists.
        let user_agent = self
            .agents
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| BUILTIN_AGENTS[0].to_string());
        RequestIdentity { user_agent }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.iter().any(|a| a == agent)
    }

    fn shuffled(mut agents: Vec<String>, source: Option<PathBuf>) -> Self {
        agents.shuffle(&mut rand::thread_rng());
        Self {
            agents: agents.into(),
            source,
        }
    }
}

fn parse_agents(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool_from(text: &str) -> (tempfile::TempDir, Result<UserAgentPool, IdentityError>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.txt");
        std::fs::write(&path, text).unwrap();
        let pool = UserAgentPool::from_file(&path);
        (dir, pool)
    }

    #[test]
    fn builtin_pool_is_non_empty() {
        let pool = UserAgentPool::builtin();
        assert_eq!(pool.len(), BUILTIN_AGENTS.len());
        assert!(pool.contains(&pool.pick().user_agent));
    }

    #[test]
    fn parses_quoted_lines_and_skips_noise() {
        let (_dir, pool) =
            pool_from("\"Agent/1.0\"\n\n# comment\n'Agent/2.0'\n   Agent/3.0  \n\"\"\n");
        let pool = pool.unwrap();
        assert_eq!(pool.len(), 3);
        for agent in ["Agent/1.0", "Agent/2.0", "Agent/3.0"] {
            assert!(pool.contains(agent), "missing {agent}");
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        let (_dir, pool) = pool_from("\n# nothing\n");
        assert!(matches!(pool, Err(IdentityError::Empty(_))));
    }

    #[test]
    fn reload_from_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.txt");
        std::fs::write(&path, "A/1\nB/2\nC/3\n").unwrap();

        let pool = UserAgentPool::from_file(&path).unwrap();
        let reloaded = pool.reload().unwrap().reload().unwrap();

        let a: HashSet<_> = pool.agents.iter().cloned().collect();
        let b: HashSet<_> = reloaded.agents.iter().cloned().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn pick_eventually_covers_the_pool() {
        let (_dir, pool) = pool_from("A\nB");
        let pool = pool.unwrap();
        let seen: HashSet<String> = (0..200).map(|_| pool.pick().user_agent).collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = UserAgentPool::from_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
