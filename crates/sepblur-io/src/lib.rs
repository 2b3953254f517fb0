#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and PGM format failures.
pub mod error;

/// Binary PGM (P5) encoding and decoding.
///
/// Read and write 8-bit grayscale images stored as `P5` portable graymaps.
pub mod pgm;

pub use crate::error::IoError;
