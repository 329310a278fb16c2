//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

use buddy_app_core::completion::{CompletionSettings, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Runtime configuration for buddy-server.
///
/// Every field except the API key has a default, so the dashboard starts
/// without any environment variables set. Without a key the chat routes
/// answer 503 and the travel-plan routes keep working.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8501"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://travel_buddy.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for daily-rolling log files; stdout only when unset.
    pub log_dir: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: `true`).
    pub enable_swagger: bool,

    /// Comma-separated CORS origins; any origin when unset.
    pub cors_allowed_origins: Option<String>,

    /// Credential for the completion API (`GROQ_API_KEY`).
    pub groq_api_key: Option<String>,

    pub completion_base_url: String,
    pub model: String,

    /// Chat sessions untouched for this many seconds are closed by a
    /// background sweep (default: one hour; `0` disables the sweep).
    pub session_idle_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("log_dir", &self.log_dir)
            .field("enable_swagger", &self.enable_swagger)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "<redacted>"))
            .field("completion_base_url", &self.completion_base_url)
            .field("model", &self.model)
            .field("session_idle_secs", &self.session_idle_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8501".to_owned(),
            database_url: "sqlite://travel_buddy.db".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            log_dir: None,
            enable_swagger: true,
            cors_allowed_origins: None,
            groq_api_key: None,
            completion_base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            session_idle_secs: 3600,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("BUDDY_BIND", &defaults.bind_address),
            database_url: env_or("BUDDY_DATABASE_URL", &defaults.database_url),
            log_level: env_or("BUDDY_LOG", &defaults.log_level),
            log_json: parse_bool("BUDDY_LOG_JSON", defaults.log_json),
            log_dir: env_opt("BUDDY_LOG_DIR"),
            enable_swagger: parse_bool("BUDDY_ENABLE_SWAGGER", defaults.enable_swagger),
            cors_allowed_origins: env_opt("BUDDY_CORS_ORIGINS"),
            groq_api_key: env_opt("GROQ_API_KEY"),
            completion_base_url: env_or("BUDDY_COMPLETION_BASE_URL", &defaults.completion_base_url),
            model: env_or("BUDDY_MODEL", &defaults.model),
            session_idle_secs: parse_env("BUDDY_SESSION_IDLE_SECS", defaults.session_idle_secs),
        }
    }

    /// Idle timeout for chat sessions, `None` when sweeping is disabled.
    pub fn session_idle_ttl(&self) -> Option<Duration> {
        (self.session_idle_secs > 0).then(|| Duration::from_secs(self.session_idle_secs))
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            base_url: self.completion_base_url.clone(),
            model: self.model.clone(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Unset and blank values both count as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_address, "0.0.0.0:8501");
        assert_eq!(cfg.database_url, "sqlite://travel_buddy.db");
        assert!(cfg.enable_swagger);
        assert!(cfg.groq_api_key.is_none());
        assert_eq!(cfg.completion_settings(), CompletionSettings::default());
    }

    #[test]
    fn debug_hides_api_key() {
        let cfg = Config {
            groq_api_key: Some("gsk_live_key".into()),
            ..Config::default()
        };
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("gsk_live_key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn zero_idle_secs_disables_session_sweep() {
        assert_eq!(Config::default().session_idle_ttl(), Some(Duration::from_secs(3600)));
        let cfg = Config {
            session_idle_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.session_idle_ttl(), None);
    }

    #[test]
    fn unset_number_falls_back_to_default() {
        assert_eq!(parse_env("BUDDY_TEST_UNSET_NUMBER", 42u64), 42);
    }
}
