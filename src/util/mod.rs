//! Utility types shared across the crate.
//!
//! - [`ScalarType`] / [`Element`] - array element types
//! - [`Shape`] - array extents
//! - [`Error`] / [`Result`] - Error handling

mod pod;
mod error;
mod shape;

pub use pod::*;
pub use error::*;
pub use shape::*;
