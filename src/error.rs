//! Error types for gamut mapping operations.

use thiserror::Error;

use crate::space::Space;

/// Result type for gamut mapping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving options or mapping a color.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The ray-trace strategy resolved a working space that is not an
    /// RGB-model space with bounded channels.
    #[error("an RGB gamut is required for ray-trace mapping, got {0}")]
    UnsupportedGamut(Space),

    /// A color space id could not be resolved.
    #[error("unknown color space id: {0:?}")]
    UnknownSpace(String),

    /// A `"space.channel"` coordinate reference could not be resolved.
    #[error("unknown coordinate reference: {0:?}")]
    UnknownCoordinate(String),
}
