// src/config.rs
use std::env;

const DEFAULT_BASE_URL: &str = "https://api.knotline.app";
const DEFAULT_PROJECT: &str = "knotline-dev";

/// Connection settings for the hosted backend, read from the environment
/// (with a local `.env` honored in development).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub project_id: String,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        BackendConfig {
            base_url: env::var("KNOTLINE_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            project_id: env::var("KNOTLINE_PROJECT")
                .unwrap_or_else(|_| DEFAULT_PROJECT.to_string()),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: DEFAULT_PROJECT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_hosted_backend() {
        let config = BackendConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.project_id, "knotline-dev");
    }
}
