use sepblur_image::{Image, ImageSize};

use super::{
    kernels::BlurKernel, separable_blur_slices, separable_blur_u8_with_strategy, FilterError,
};
use crate::parallel::ExecutionStrategy;

/// Blur an image with a separable kernel.
///
/// Uses `ExecutionStrategy::Auto` (parallel for images ≥100K pixels, serial otherwise).
/// For explicit control, use [`separable_blur_u8_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `temp` - Scratch image with shape (H, W, 1).
/// * `kernel` - The kernel applied along both axes.
pub fn separable_blur_u8<const N: usize>(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    temp: &mut Image<u8, 1>,
    kernel: &BlurKernel<N>,
) -> Result<(), FilterError> {
    separable_blur_u8_with_strategy(src, dst, temp, kernel, ExecutionStrategy::Auto)
}

/// Blur a grayscale image with the 5-tap binomial kernel `[1, 4, 6, 4, 1] / 16`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `temp` - Scratch image with shape (H, W, 1).
///
/// PRECONDITION: `src`, `dst` and `temp` must have the same shape.
///
/// # Example
///
/// ```
/// use sepblur_image::Image;
/// use sepblur_imgproc::filter::gaussian_blur5_u8;
///
/// let src = Image::<u8, 1>::from_size_val([16, 8].into(), 42).unwrap();
/// let mut dst = Image::from_size_val(src.size(), 0u8).unwrap();
/// let mut temp = Image::from_size_val(src.size(), 0u8).unwrap();
///
/// gaussian_blur5_u8(&src, &mut dst, &mut temp).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 42));
/// ```
pub fn gaussian_blur5_u8(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    temp: &mut Image<u8, 1>,
) -> Result<(), FilterError> {
    separable_blur_u8(src, dst, temp, &BlurKernel::BINOMIAL_5)
}

/// Blur raw row-major buffers with the 5-tap binomial kernel.
///
/// `input` is blurred vertically into `temp`, then `temp` horizontally into `output`.
///
/// # Arguments
///
/// * `output` - Destination buffer of `width * height` pixels.
/// * `input` - Source buffer of `width * height` pixels.
/// * `width` - Number of columns.
/// * `height` - Number of rows.
/// * `temp` - Scratch buffer of `width * height` pixels.
///
/// # Panics
///
/// If any buffer does not hold exactly `width * height` pixels.
pub fn blur_u8_slices(
    output: &mut [u8],
    input: &[u8],
    width: usize,
    height: usize,
    temp: &mut [u8],
) {
    let size = ImageSize { width, height };
    let num_pixels = size.num_pixels();
    assert_eq!(input.len(), num_pixels, "input buffer does not match {size}");
    assert_eq!(output.len(), num_pixels, "output buffer does not match {size}");
    assert_eq!(temp.len(), num_pixels, "temp buffer does not match {size}");

    separable_blur_slices(
        output,
        input,
        temp,
        size,
        &BlurKernel::BINOMIAL_5,
        ExecutionStrategy::Auto.is_parallel(num_pixels),
    );
}
