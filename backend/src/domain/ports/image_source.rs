//! Driven port for resolving display images from a remote search provider.
//!
//! The domain owns the request and response shapes so the reconciler and the
//! add-item flow stay adapter-agnostic. Errors are typed rather than
//! swallowed here; callers decide to substitute [`fallback_image`] and keep
//! going, which also lets them log *why* a lookup fell back.

use async_trait::async_trait;

use crate::domain::item::{ImageUrl, ItemName};

use super::define_port_error;

/// Static image served whenever remote lookup fails or is unconfigured.
pub const FALLBACK_IMAGE_URL: &str = "/static/food.png";

/// The fallback image as a validated [`ImageUrl`].
///
/// # Examples
///
/// ```
/// use backend::domain::ports::{fallback_image, FALLBACK_IMAGE_URL};
///
/// assert_eq!(fallback_image().as_ref(), FALLBACK_IMAGE_URL);
/// ```
#[must_use]
pub fn fallback_image() -> ImageUrl {
    match ImageUrl::new(FALLBACK_IMAGE_URL) {
        Ok(url) => url,
        Err(err) => panic!("fallback image constant must be valid: {err}"),
    }
}

define_port_error! {
    /// Errors surfaced while querying the image provider.
    pub enum ImageSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "image lookup transport failed: {message}",
        /// The lookup exceeded its bounded timeout.
        Timeout { message: String } =>
            "image lookup timed out: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "image response decode failed: {message}",
        /// The provider answered but returned no usable results.
        NoResults { query: String } =>
            "image lookup returned no results for {query}",
        /// The provider rejected the request.
        Rejected { message: String } =>
            "image lookup rejected: {message}",
    }
}

/// Port for resolving a display image URL from a food name.
///
/// Side-effect free from the caller's perspective; the remote service is an
/// implementation detail. Adapters must bound the call with a timeout so a
/// slow provider cannot stall a pantry view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Look up a display image for one food name.
    async fn resolve(&self, name: &ItemName) -> Result<ImageUrl, ImageSourceError>;
}

/// Image source used when no provider is configured.
///
/// Always reports [`ImageSourceError::NoResults`], which callers translate
/// into the static fallback image.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredImageSource;

#[async_trait]
impl ImageSource for UnconfiguredImageSource {
    async fn resolve(&self, name: &ItemName) -> Result<ImageUrl, ImageSourceError> {
        Err(ImageSourceError::no_results(name.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::item::ItemName;

    #[test]
    fn fallback_image_matches_constant() {
        assert_eq!(fallback_image().as_ref(), FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn unconfigured_source_reports_no_results() {
        let source = UnconfiguredImageSource;
        let name = ItemName::new("bananas").expect("valid name");
        let err = source.resolve(&name).await.expect_err("must fail");
        assert!(matches!(err, ImageSourceError::NoResults { .. }));
    }
}
