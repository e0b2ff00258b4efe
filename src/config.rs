// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Values come from (highest precedence first):
//   1. CLI flags (only --db today, applied by main.rs)
//   2. Environment variables (optionally loaded from a .env file)
//   3. Built-in defaults
//
// The GitHub token is read here once and handed to the client explicitly,
// so nothing deeper in the program looks at the environment.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_DATABASE_PATH: &str = "repo-scribe.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the GitHub REST API
#[derive(Clone)]
pub struct GithubConfig {
    pub api_base_url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub token: Option<String>,
    pub user_agent: String,
}

// Hand-written so the token never ends up in a log line
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base_url", &self.api_base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            user_agent: format!("repo-scribe/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub database_path: PathBuf,
    /// Wraps each upstream call; expiry is reported as a network error
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key -> value lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut github = GithubConfig::default();
        if let Some(base) = get("GITHUB_API_URL") {
            github.api_base_url = base.trim_end_matches('/').to_string();
        }
        github.token = get("GITHUB_TOKEN");

        let database_path = get("REPO_SCRIBE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let timeout_secs = match get("REPO_SCRIBE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(value = %raw, "Invalid REPO_SCRIBE_TIMEOUT_SECS, using default");
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            github,
            database_path,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            api = %self.github.api_base_url,
            authenticated = self.github.token.is_some(),
            database = %self.database_path.display(),
            timeout_secs = self.request_timeout.as_secs(),
            "Loaded configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.github.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.github.token.is_none());
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.github.user_agent.starts_with("repo-scribe/"));
    }

    #[test]
    fn test_reads_token_and_overrides() {
        let config = config_from(&[
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITHUB_API_URL", "http://127.0.0.1:9999/"),
            ("REPO_SCRIBE_DB", "/tmp/docs.db"),
            ("REPO_SCRIBE_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.github.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.github.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.database_path, PathBuf::from("/tmp/docs.db"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_token_counts_as_unset() {
        let config = config_from(&[("GITHUB_TOKEN", "   ")]);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_bad_timeout_falls_back_to_default() {
        let config = config_from(&[("REPO_SCRIBE_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let config = config_from(&[("GITHUB_TOKEN", "ghp_secret")]);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("<redacted>"));
    }
}
