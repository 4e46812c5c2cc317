//! ingamut implements the gamut mapping strategies of the CSS color
//! specification: per-channel clipping, perceptual chroma/coordinate
//! reduction bounded by a deltaE metric, and ray tracing toward the
//! achromatic axis.

#![deny(missing_docs)]

mod color;
mod convert;
mod delta_e;
mod error;
mod gamut;
mod math;
mod space;

#[cfg(test)]
mod test;

pub use color::{Color, Component, Components, Flags};
pub use delta_e::DeltaEMethod;
pub use error::{Error, Result};
pub use gamut::{BlackWhiteClamp, GamutOptions, Method, Preset};
pub use space::{Channel, CoordRef, Space};
