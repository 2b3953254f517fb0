//! Filter operations
//!
//! This module provides the separable blur used to smooth grayscale images.

/// Filter kernels
pub mod kernels;

/// Filter error types
mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
