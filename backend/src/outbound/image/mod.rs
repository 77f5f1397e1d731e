//! Outbound image-search adapter.

mod dto;
mod http_source;

pub use http_source::{HttpImageSource, DEFAULT_LOOKUP_TIMEOUT};
