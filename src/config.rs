//! Runtime configuration.
//!
//! Defaults reproduce the fixed dashboard setup. Overrides are opt-in: with no
//! `ate_dashboard.toml` and no `ATE_DASHBOARD_*` variables set, nothing
//! outside the defaults is read.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_FILE: &str = "ate_dashboard.toml";
pub const ENV_PREFIX: &str = "ATE_DASHBOARD_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Figment(#[from] figment::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("ate-bad-dates.csv"),
            host: "127.0.0.1".to_string(),
            port: 8071,
            debug: true,
            chart_width: 1200,
            chart_height: 500,
            export_dir: None,
        }
    }
}

impl Config {
    /// Defaults, then `ate_dashboard.toml`, then environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    pub fn listen_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}
