//! DTOs for decoding image-search JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then picks the first
//! usable hit in one pass.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct ImageSearchResponseDto {
    #[serde(default)]
    pub(super) hits: Vec<ImageHitDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageHitDto {
    #[serde(rename = "webformatURL")]
    pub(super) webformat_url: Option<String>,
}

impl ImageSearchResponseDto {
    /// First hit with a non-empty display URL, if any.
    pub(super) fn into_first_image(self) -> Option<String> {
        self.hits
            .into_iter()
            .filter_map(|hit| hit.webformat_url)
            .find(|url| !url.trim().is_empty())
    }
}
