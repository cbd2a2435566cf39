/// Service configuration loader - parses aqmap.toml
///
/// Separates tunables from code: the OpenAQ base URL, page size, retry
/// policy, and endpoint settings can all change without recompiling the
/// service. Every field has a built-in default, so the file itself is
/// optional and may be partial.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub api: ApiConfig,
    pub server: ServerConfig,
}

/// OpenAQ client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the OpenAQ v2 API. Overridden in tests to point at a
    /// local server.
    pub base_url: String,
    /// Locations page size (`limit` query parameter). OpenAQ caps the
    /// page size, which is why the pipeline paginates at all.
    pub page_size: u32,
    /// Total attempts per outbound call, including the first.
    pub retry_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

/// HTTP endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Size of the request-handling thread pool.
    pub workers: usize,
    /// Upper bound for the coordinate-mode radius, in meters.
    pub max_radius_meters: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: crate::ingest::openaq::OPENAQ_BASE_URL.to_string(),
            page_size: 100,
            retry_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8080,
            workers: 4,
            max_radius_meters: 25_000,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            api: ApiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Loads the service configuration from `aqmap.toml` in the current
/// working directory, falling back to defaults when the file is absent.
///
/// # Panics
/// Panics if the file exists but is unreadable or malformed. This is
/// intentional — starting with a silently ignored configuration would be
/// worse than not starting.
pub fn load_config() -> ServiceConfig {
    load_config_from(Path::new("aqmap.toml"))
}

/// Loads from an explicit path; see `load_config`.
pub fn load_config_from(path: &Path) -> ServiceConfig {
    if !path.exists() {
        return ServiceConfig::default();
    }

    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}
