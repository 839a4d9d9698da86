// Error types shared by the library. Each collaborator gets its own enum
// so the session can decide per class whether a failure is reported,
// retried or propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the catalog configuration (environment, flags, key file).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("no API key configured")]
    MissingApiKey,

    #[error("invalid timeout '{0}': expected a whole number of seconds")]
    InvalidTimeout(String),
}

/// User input that does not follow the expected grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a date in YYYY-MM-DD form")]
    InvalidDate(String),
}

/// Failures of a catalog query.
///
/// `endpoint` is the request URL without its query string, so the API key
/// never ends up in a message shown to the user.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build a request URL from '{0}'")]
    Url(String),
}

impl CatalogError {
    /// True for failures of the network exchange itself (connection or
    /// non-success status), as opposed to a malformed payload.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Failures while fetching, decoding or handing an image to a viewer.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("could not download {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} is not a readable image: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot prepare {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no viewer could open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
