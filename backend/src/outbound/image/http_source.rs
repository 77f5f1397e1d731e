//! Reqwest-backed image-search adapter.
//!
//! This adapter owns transport details only: query encoding, timeout and
//! HTTP error mapping, and JSON decoding into a display URL. The provider
//! follows the Pixabay wire shape: a keyed GET with the food name as the
//! `q` parameter answering `{ "hits": [{ "webformatURL": ... }] }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::dto::ImageSearchResponseDto;
use crate::domain::item::{ImageUrl, ItemName};
use crate::domain::ports::{ImageSource, ImageSourceError};

/// Default bound on one image lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Image-search adapter performing keyed HTTP GET requests against one
/// endpoint.
pub struct HttpImageSource {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpImageSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn resolve(&self, name: &ItemName) -> Result<ImageUrl, ImageSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", name.as_ref()),
                ("image_type", "photo"),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_first_image(body.as_ref(), name.as_ref())
    }
}

fn parse_first_image(body: &[u8], query: &str) -> Result<ImageUrl, ImageSourceError> {
    let decoded: ImageSearchResponseDto = serde_json::from_slice(body).map_err(|error| {
        ImageSourceError::decode(format!("invalid image search JSON payload: {error}"))
    })?;

    let url = decoded
        .into_first_image()
        .ok_or_else(|| ImageSourceError::no_results(query))?;
    ImageUrl::new(url).map_err(|error| ImageSourceError::decode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> ImageSourceError {
    if error.is_timeout() {
        ImageSourceError::timeout(error.to_string())
    } else {
        ImageSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageSourceError::timeout(message)
        }
        _ if status.is_client_error() => ImageSourceError::rejected(message),
        _ => ImageSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_first_usable_hit() {
        let body = r#"{
            "total": 3,
            "hits": [
                { "webformatURL": "" },
                { "webformatURL": "https://img.example/banana.jpg" },
                { "webformatURL": "https://img.example/other.jpg" }
            ]
        }"#;

        let url = parse_first_image(body.as_bytes(), "banana").expect("JSON should decode");
        assert_eq!(url.as_ref(), "https://img.example/banana.jpg");
    }

    #[test]
    fn empty_hit_list_reports_no_results() {
        let body = r#"{ "total": 0, "hits": [] }"#;

        let error = parse_first_image(body.as_bytes(), "banana").expect_err("must fail");
        assert!(
            matches!(error, ImageSourceError::NoResults { .. }),
            "empty hits should map to NoResults",
        );
        assert!(error.to_string().contains("banana"));
    }

    #[test]
    fn hits_without_urls_report_no_results() {
        let body = r#"{ "hits": [ { "previewURL": "https://img.example/p.jpg" } ] }"#;

        let error = parse_first_image(body.as_bytes(), "banana").expect_err("must fail");
        assert!(matches!(error, ImageSourceError::NoResults { .. }));
    }

    #[test]
    fn malformed_json_reports_decode() {
        let error = parse_first_image(b"<html>oops</html>", "banana").expect_err("must fail");
        assert!(matches!(error, ImageSourceError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "Rejected")]
    #[case::bad_key(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\":\"nope\"}");
        match expected {
            "Timeout" => assert!(
                matches!(error, ImageSourceError::Timeout { .. }),
                "timeout statuses should map to Timeout",
            ),
            "Rejected" => assert!(
                matches!(error, ImageSourceError::Rejected { .. }),
                "client statuses should map to Rejected",
            ),
            "Transport" => assert!(
                matches!(error, ImageSourceError::Transport { .. }),
                "other statuses should map to Transport",
            ),
            other => panic!("unsupported test expectation: {other}"),
        }
    }

    #[test]
    fn long_bodies_are_previewed_with_ellipsis() {
        let body = "x".repeat(400);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        let message = error.to_string();
        assert!(message.contains("..."));
        assert!(message.len() < body.len());
    }
}
