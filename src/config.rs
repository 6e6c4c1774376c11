//! Server settings read from the environment.

use std::time::Duration;

/// Settings for the web binary. Every field has a default so the server starts without any
/// environment set.
#[derive(Clone, Debug)]
pub struct Config {
    /// `HOST`, default `0.0.0.0` so the app is reachable from outside a VPS.
    pub host: String,
    /// `PORT`, default 8080.
    pub port: u16,
    /// `BACKEND_URL`: the squad API.
    pub backend_url: String,
    /// `SEARCH_DEBOUNCE_MS`.
    pub search_debounce: Duration,
    /// `SESSION_KEY`: cookie signing key, at least 64 bytes. Generated per start when unset.
    pub session_key: Option<Vec<u8>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend_url: "http://localhost:5000".to_string(),
            search_debounce: crate::logic::DEFAULT_DEBOUNCE,
            session_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            backend_url: lookup("BACKEND_URL").unwrap_or(defaults.backend_url),
            search_debounce: lookup("SEARCH_DEBOUNCE_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            session_key: lookup("SESSION_KEY")
                .map(String::into_bytes)
                .filter(|key| key.len() >= 64),
        }
    }
}
