//! Outbound (driven) adapters: persistence, image search, and email.

pub mod email;
pub mod image;
pub mod persistence;
