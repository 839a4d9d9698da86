// Catalog configuration: where the API lives, which key to send and how
// long to wait. Built once in `main` from the command line (which also
// reads the environment) and handed to the clients; nothing here is global.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/mars-photos/api/v1";
/// NASA's shared, rate-limited key for trying the API without signing up.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const BASE_URL_VAR: &str = "MARS_PHOTOS_API_URL";
pub const API_KEY_VAR: &str = "NASA_API_KEY";
pub const TIMEOUT_VAR: &str = "MARS_PHOTOS_TIMEOUT_SECS";

/// Name of the key file looked up in the home directory.
const KEY_FILE_NAME: &str = ".nasa_api_key";

/// Unparsed configuration values, highest-priority source already chosen
/// per field (a flag beats its environment variable).
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<String>,
    /// Where to look for a key when none is given
    pub key_file: Option<PathBuf>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct CatalogConfig {
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl CatalogConfig {
    /// Build a configuration with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` does not parse or
    /// cannot carry path segments, and `ConfigError::MissingApiKey` if the
    /// key is blank.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Resolve a configuration from raw values, the way they arrive from
    /// flags or the environment. Blank values count as unset. A missing key
    /// falls back to the key file, then to `DEMO_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any of the values present is invalid.
    pub fn from_sources(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let base_url = present(&sources.base_url).unwrap_or(DEFAULT_BASE_URL);
        let api_key = present(&sources.api_key)
            .map(str::to_string)
            .or_else(|| sources.key_file.as_deref().and_then(read_key_file))
            .unwrap_or_else(|| DEFAULT_API_KEY.into());

        let mut config = Self::new(base_url, api_key)?;
        if let Some(raw) = present(&sources.timeout) {
            config.timeout = parse_timeout(raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Keep the key out of `{:?}` so it cannot leak through logs.
impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot carry a path".into(),
        });
    }
    Ok(url)
}

/// Parse a whole number of seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for anything else.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))
}

/// Location of the optional key file in the user's home directory.
#[must_use]
pub fn key_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(KEY_FILE_NAME))
}

/// First non-empty line of the key file, if the file can be read.
#[must_use]
pub fn read_key_file(path: &Path) -> Option<String> {
    let data = std::fs::read_to_string(path).ok()?;
    data.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_uses_default_timeout() {
        let config = CatalogConfig::new(DEFAULT_BASE_URL, "abc").unwrap();
        assert_eq!(config.api_key(), "abc");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_blank_key() {
        let err = CatalogConfig::new(DEFAULT_BASE_URL, "   ").unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = CatalogConfig::new("not a url", "abc").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = CatalogConfig::new("mailto:someone@example.com", "abc").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CatalogConfig::new(DEFAULT_BASE_URL, "super-secret").unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("12").unwrap(), Duration::from_secs(12));
        assert!(matches!(
            parse_timeout("soon"),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_read_key_file_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n   \n  my-key  \nsecond").unwrap();
        assert_eq!(read_key_file(file.path()), Some("my-key".to_string()));
    }

    #[test]
    fn test_read_key_file_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_key_file(&dir.path().join("absent")), None);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(read_key_file(empty.path()), None);
    }

    #[test]
    fn test_sources_defaults() {
        let config = CatalogConfig::from_sources(&ConfigSources::default()).unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), DEFAULT_API_KEY);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_blank_sources_count_as_unset() {
        let sources = ConfigSources {
            base_url: Some("  ".into()),
            api_key: Some(String::new()),
            timeout: Some("".into()),
            key_file: None,
        };
        let config = CatalogConfig::from_sources(&sources).unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), DEFAULT_API_KEY);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_blank_key_falls_back_to_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-key").unwrap();
        let sources = ConfigSources {
            api_key: Some("   ".into()),
            key_file: Some(file.path().to_path_buf()),
            ..ConfigSources::default()
        };
        let config = CatalogConfig::from_sources(&sources).unwrap();
        assert_eq!(config.api_key(), "file-key");
    }

    #[test]
    fn test_given_key_beats_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-key").unwrap();
        let sources = ConfigSources {
            api_key: Some("given".into()),
            key_file: Some(file.path().to_path_buf()),
            ..ConfigSources::default()
        };
        assert_eq!(CatalogConfig::from_sources(&sources).unwrap().api_key(), "given");
    }

    #[test]
    fn test_bad_source_values() {
        let sources = ConfigSources {
            timeout: Some("abc".into()),
            ..ConfigSources::default()
        };
        assert!(matches!(
            CatalogConfig::from_sources(&sources),
            Err(ConfigError::InvalidTimeout(_))
        ));

        let sources = ConfigSources {
            base_url: Some("nowhere".into()),
            ..ConfigSources::default()
        };
        assert!(matches!(
            CatalogConfig::from_sources(&sources),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
