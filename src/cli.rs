// Command-line arguments. Every flag can also come from the environment,
// and clap picks the flag when both are given. Blank values count as unset
// and fall back to the key file or the built-in defaults.

use crate::config::{
    key_file_path, CatalogConfig, ConfigSources, API_KEY_VAR, BASE_URL_VAR, TIMEOUT_VAR,
};
use crate::error::ConfigError;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "mars-photos", version, about = "Browse Mars rover photos from the terminal")]
pub struct Cli {
    /// API key sent with every catalog request
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the photo catalog API
    #[arg(long, env = BASE_URL_VAR)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = TIMEOUT_VAR, value_name = "SECS")]
    pub timeout: Option<String>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Raw configuration values, with the key file in the home directory as
    /// the fallback for a missing key.
    #[must_use]
    pub fn sources(&self) -> ConfigSources {
        ConfigSources {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout.clone(),
            key_file: key_file_path(),
        }
    }

    /// Build the catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an invalid URL or timeout.
    pub fn config(&self) -> Result<CatalogConfig, ConfigError> {
        CatalogConfig::from_sources(&self.sources())
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
