use sepblur_image::ImageError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel has an even number of taps and no center tap.
    #[error("Kernel length must be odd, got {0}")]
    EvenKernelLength(usize),

    /// The kernel is not a palindrome.
    #[error("Kernel weights must be symmetric")]
    AsymmetricKernel,

    /// The kernel weights do not sum to a power of two.
    #[error("Kernel weights must sum to a power of two, got {0}")]
    KernelSumNotPowerOfTwo(u32),

    /// The kernel weights sum above the supported maximum.
    #[error("Kernel weights sum ({0}) exceeds the supported maximum")]
    KernelSumTooLarge(u64),

    /// Error coming from the image buffers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the execution strategy.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
