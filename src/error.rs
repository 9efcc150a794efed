//! Error type for the rendering core.
//!
//! Collaborator adapters (`api`, `device`, `service`, `storage`) use `anyhow` instead;
//! this enum only covers what a render call can report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rate code outside the classifier table (`0..=8`).
    #[error("invalid rate code {0}: expected a value in 0..=8")]
    InvalidRateCode(i32),

    /// The drawing backend rejected an operation.
    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("jpeg encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Font resources could not be loaded or registered.
    #[error("font resources: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
