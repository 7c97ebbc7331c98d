//! # recon-config
//!
//! Layered configuration loading for recon using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RECON_*` prefix, `__` as separator)
//! 2. Project-level `.recon/config.toml`
//! 3. User-level `~/.config/recon/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RECON_API__BASE_URL` -> `api.base_url`,
//! `RECON_RESOLUTION__ROUNDS` -> `resolution.rounds`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use recon_config::ReconConfig;
//!
//! let config = ReconConfig::load_with_dotenv().expect("config");
//! let budget = config.resolution.budget();
//! if config.api.is_configured() {
//!     println!("backend: {} ({} rounds)", config.api.base_url, budget.rounds);
//! }
//! ```

mod api;
mod error;
mod resolution;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use resolution::ResolutionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl ReconConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or the resulting
    /// resolution bounds are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.resolution.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// The API section, or [`ConfigError::NotConfigured`] when no backend
    /// base URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for an empty `api.base_url`.
    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        if self.api.is_configured() {
            Ok(&self.api)
        } else {
            Err(ConfigError::NotConfigured {
                section: "api".to_string(),
            })
        }
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".recon/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("RECON_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("recon").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (if set) looking for `.env`, then
    /// falls back to the current directory. Missing files are not an error.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = ReconConfig::default();
        assert!(!config.api.is_configured());
        assert_eq!(config.resolution.rounds, 6);
    }

    #[test]
    fn require_api_reports_missing_section() {
        let config = ReconConfig::default();
        let err = config.require_api().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "api"));
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = ReconConfig::figment();
        let config: ReconConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert!(config.resolution.validate().is_ok());
    }
}
