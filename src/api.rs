// API client module: a small blocking HTTP client for the Mars rover photo
// catalog. Two read-only queries are supported: list the rovers, and list
// the photos a rover took on a given Earth date. Pagination happens on the
// client side over the full list the API returns.

use crate::config::CatalogConfig;
use crate::date::DateFilter;
use crate::error::CatalogError;
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::{Client, Request};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A named collection of photos (one rover). Only `name` is required; the
/// date range fields are used as a hint at the date prompt when present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub landing_date: Option<String>,
    #[serde(default)]
    pub max_date: Option<String>,
}

impl Collection {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            landing_date: None,
            max_date: None,
        }
    }

    /// "photos from A to B" when both ends of the range are known.
    #[must_use]
    pub fn date_hint(&self) -> Option<String> {
        match (&self.landing_date, &self.max_date) {
            (Some(from), Some(to)) => Some(format!("photos from {from} to {to}")),
            _ => None,
        }
    }
}

/// A reference to one displayable image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "img_src")]
    pub url: String,
}

impl PhotoItem {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
        }
    }
}

/// Body of `GET /rovers`.
#[derive(Deserialize, Debug)]
struct RoversResponse {
    #[serde(default)]
    rovers: Vec<Collection>,
}

/// Body of `GET /rovers/{name}/photos`.
#[derive(Deserialize, Debug)]
struct PhotosResponse {
    #[serde(default)]
    photos: Vec<PhotoItem>,
}

/// Read-only access to the photo catalog. The session only talks to this
/// trait so tests can swap in a stub.
pub trait Catalog {
    /// List the available collections.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on transport failure or a malformed body.
    fn list_collections(&self) -> Result<Vec<Collection>, CatalogError>;

    /// List the photos of `collection` taken on `date`, in API order.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on transport failure or a malformed body.
    fn list_items(&self, collection: &str, date: &DateFilter)
        -> Result<Vec<PhotoItem>, CatalogError>;
}

/// Catalog client holding a reqwest blocking client, the API base URL
/// and the key appended to every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    /// Create an ApiClient from an explicit configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.base_url().clone(),
            api_key: config.api_key().to_string(),
        })
    }

    /// Base URL extended with `segments`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET {base}/rovers?api_key=...`
    pub fn collections_request(&self) -> Result<Request, CatalogError> {
        let url = self.endpoint(&["rovers"])?;
        self.client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .build()
            .map_err(|e| CatalogError::Url(e.to_string()))
    }

    /// `GET {base}/rovers/{collection}/photos?earth_date=...&api_key=...`
    pub fn items_request(
        &self,
        collection: &str,
        date: &DateFilter,
    ) -> Result<Request, CatalogError> {
        let url = self.endpoint(&["rovers", collection, "photos"])?;
        self.client
            .get(url)
            .query(&[("earth_date", date.as_str()), ("api_key", self.api_key.as_str())])
            .build()
            .map_err(|e| CatalogError::Url(e.to_string()))
    }

    /// Send a prepared request and return the body text, failing on
    /// transport errors and non-success statuses.
    fn execute(&self, request: Request) -> Result<(String, String), CatalogError> {
        let endpoint = redacted(request.url());
        debug!("GET {endpoint}");
        let res = self
            .client
            .execute(request)
            .map_err(|source| CatalogError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(CatalogError::Status {
                endpoint,
                status,
                body,
            });
        }
        let body = res.text().map_err(|source| CatalogError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;
        Ok((endpoint, body))
    }
}

impl Catalog for ApiClient {
    fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let (endpoint, body) = self.execute(self.collections_request()?)?;
        let rovers = decode_collections(&endpoint, &body)?;
        info!("catalog lists {} rovers", rovers.len());
        Ok(rovers)
    }

    fn list_items(
        &self,
        collection: &str,
        date: &DateFilter,
    ) -> Result<Vec<PhotoItem>, CatalogError> {
        let (endpoint, body) = self.execute(self.items_request(collection, date)?)?;
        let photos = decode_items(&endpoint, &body)?;
        info!("{collection} has {} photos on {date}", photos.len());
        Ok(photos)
    }
}

/// Decode the `rovers` array of a collections response.
pub fn decode_collections(endpoint: &str, body: &str) -> Result<Vec<Collection>, CatalogError> {
    decode::<RoversResponse>(endpoint, body).map(|r| r.rovers)
}

/// Decode the `photos` array of an items response.
pub fn decode_items(endpoint: &str, body: &str) -> Result<Vec<PhotoItem>, CatalogError> {
    decode::<PhotosResponse>(endpoint, body).map(|r| r.photos)
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// The URL without its query string, safe to show and log.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSources;

    fn client(base: &str) -> ApiClient {
        let config = CatalogConfig::from_sources(&ConfigSources {
            base_url: Some(base.into()),
            api_key: Some("test-key".into()),
            timeout: Some("1".into()),
            key_file: None,
        })
        .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_collections_request_url() {
        let api = client("https://api.nasa.gov/mars-photos/api/v1");
        let req = api.collections_request().unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://api.nasa.gov/mars-photos/api/v1/rovers?api_key=test-key"
        );
    }

    #[test]
    fn test_items_request_url() {
        let api = client("https://api.nasa.gov/mars-photos/api/v1/");
        let date = DateFilter::parse("2023-01-10").unwrap();
        let req = api.items_request("Curiosity", &date).unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://api.nasa.gov/mars-photos/api/v1/rovers/Curiosity/photos?earth_date=2023-01-10&api_key=test-key"
        );
    }

    #[test]
    fn test_collection_name_is_escaped() {
        let api = client("http://localhost:3001");
        let date = DateFilter::parse("2023-01-10").unwrap();
        let req = api.items_request("a b/c", &date).unwrap();
        assert_eq!(req.url().path(), "/rovers/a%20b%2Fc/photos");
    }

    #[test]
    fn test_redacted_drops_key() {
        let url = Url::parse("https://example.com/rovers?api_key=secret").unwrap();
        assert_eq!(redacted(&url), "https://example.com/rovers");
    }

    #[test]
    fn test_decode_collections() {
        let body = r#"{"rovers":[
            {"id":5,"name":"Curiosity","landing_date":"2012-08-06","max_date":"2024-02-19","status":"active"},
            {"id":7,"name":"Spirit"}
        ]}"#;
        let rovers = decode_collections("e", body).unwrap();
        assert_eq!(rovers.len(), 2);
        assert_eq!(rovers[0].name, "Curiosity");
        assert_eq!(
            rovers[0].date_hint().as_deref(),
            Some("photos from 2012-08-06 to 2024-02-19")
        );
        assert_eq!(rovers[1], Collection::named("Spirit"));
        assert_eq!(rovers[1].date_hint(), None);
    }

    #[test]
    fn test_decode_items_keeps_order() {
        let body = r#"{"photos":[
            {"id":1,"img_src":"http://mars.jpl.nasa.gov/a.jpg","sol":10},
            {"id":2,"img_src":"http://mars.jpl.nasa.gov/b.jpg"}
        ]}"#;
        let photos = decode_items("e", body).unwrap();
        let urls: Vec<_> = photos.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["http://mars.jpl.nasa.gov/a.jpg", "http://mars.jpl.nasa.gov/b.jpg"]
        );
        assert_eq!(photos[0].id, Some(1));
    }

    #[test]
    fn test_missing_field_is_empty() {
        assert!(decode_items("e", "{}").unwrap().is_empty());
        assert!(decode_collections("e", r#"{"other":1}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_items("https://example.com/x", "<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }));
        assert!(!err.is_transport());

        let err = decode_items("e", r#"{"photos":[{"id":1}]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }));
    }
}
