//! HTTP client for the gallery API.
//!
//! Four read-only endpoints, all answering with the [`ApiResponse`] envelope:
//!
//! | Call | Request |
//! |------|---------|
//! | [`ApiClient::list_illustrations`] | `GET /illustrations?status=<status>` |
//! | [`ApiClient::get_illustration_by_slug`] | `GET /illustrations/slug/<slug>` |
//! | [`ApiClient::get_illustration`] | `GET /illustrations/<id>` |
//! | [`ApiClient::get_author`] | `GET /author` |
//!
//! The client is blocking: a build issues a handful of sequential requests and
//! has nothing to overlap them with. Timeouts are reqwest's defaults and there
//! are no retries.
//!
//! Errors are returned, not swallowed. Degrading them into empty pages is the
//! job of [`crate::load`].

use crate::types::{ApiResponse, AuthorProfile, Illustration, Status};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    Url(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url} cannot be a base URL")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("illust-gal/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and decode the envelope.
    ///
    /// A non-2xx response whose body is still an envelope (e.g. a 404 with
    /// `{"success": false}`) is returned as that envelope; the caller decides
    /// what an unsuccessful answer means.
    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ApiResponse<T>, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        let body = response.text()?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(source) if status.is_success() => Err(ApiError::Decode {
                url: url.to_string(),
                source,
            }),
            Err(_) => Err(ApiError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }

    /// List illustrations, optionally filtered by status.
    pub fn list_illustrations(
        &self,
        status: Option<Status>,
    ) -> Result<ApiResponse<Vec<Illustration>>, ApiError> {
        let mut url = self.endpoint(&["illustrations"])?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        self.get(url)
    }

    pub fn get_illustration_by_slug(
        &self,
        slug: &str,
    ) -> Result<ApiResponse<Illustration>, ApiError> {
        let url = self.endpoint(&["illustrations", "slug", slug])?;
        self.get(url)
    }

    pub fn get_illustration(&self, id: &str) -> Result<ApiResponse<Illustration>, ApiError> {
        let url = self.endpoint(&["illustrations", id])?;
        self.get(url)
    }

    pub fn get_author(&self) -> Result<ApiResponse<AuthorProfile>, ApiError> {
        let url = self.endpoint(&["author"])?;
        self.get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(ApiClient::new("nope"), Err(ApiError::Url(_))));
    }

    #[test]
    fn rejects_non_base_url() {
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ApiError::Url(_))
        ));
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let client = ApiClient::new("https://api.example.com/v1/").unwrap();
        let url = client.endpoint(&["illustrations", "slug", "dusk"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/illustrations/slug/dusk");
    }

    #[test]
    fn endpoint_without_trailing_slash() {
        let client = ApiClient::new("https://api.example.com").unwrap();
        let url = client.endpoint(&["author"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/author");
    }

    #[test]
    fn endpoint_encodes_slug_segment() {
        let client = ApiClient::new("https://api.example.com").unwrap();
        let url = client.endpoint(&["illustrations", "slug", "a b/c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/illustrations/slug/a%20b%2Fc"
        );
    }
}
