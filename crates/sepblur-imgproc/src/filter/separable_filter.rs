use sepblur_image::{Image, ImageError, ImageSize};

use super::{kernels::BlurKernel, FilterError};
use crate::parallel::{self, ExecutionStrategy};

// Compute one output row of the vertical pass. Every tap reads `src` with a column stride.
fn vertical_row<const N: usize>(
    dst_row: &mut [u8],
    r: usize,
    src: &[u8],
    size: ImageSize,
    kernel: &BlurKernel<N>,
) {
    let window = kernel.window(r, size.height);
    for (c, out) in dst_row.iter_mut().enumerate() {
        *out = window.apply(kernel, |y| src[y * size.width + c]);
    }
}

// Compute one output row of the horizontal pass from the matching source row.
fn horizontal_row<const N: usize>(dst_row: &mut [u8], src_row: &[u8], kernel: &BlurKernel<N>) {
    let width = src_row.len();
    for (c, out) in dst_row.iter_mut().enumerate() {
        *out = kernel.window(c, width).apply(kernel, |x| src_row[x]);
    }
}

/// Run the vertical then the horizontal pass over raw buffers.
///
/// PRECONDITION: `dst`, `src` and `temp` hold exactly `size.width * size.height` pixels.
pub(crate) fn separable_blur_slices<const N: usize>(
    dst: &mut [u8],
    src: &[u8],
    temp: &mut [u8],
    size: ImageSize,
    kernel: &BlurKernel<N>,
    parallel: bool,
) {
    parallel::for_each_row_mut(temp, size.width, parallel, |r, row| {
        vertical_row(row, r, src, size, kernel)
    });

    // the horizontal pass only starts once every row of `temp` is written
    let temp: &[u8] = temp;
    parallel::for_each_row_mut(dst, size.width, parallel, |r, row| {
        horizontal_row(row, &temp[r * size.width..(r + 1) * size.width], kernel)
    });
}

fn check_same_size(a: ImageSize, b: ImageSize) -> Result<(), ImageError> {
    if a != b {
        return Err(ImageError::InvalidImageSize(
            a.width, a.height, b.width, b.height,
        ));
    }
    Ok(())
}

/// Convolve every column of an image with a 1D kernel.
///
/// Rows closer than `radius` to the top or bottom border only use the taps that fall
/// inside the image and are renormalized by the sum of those taps.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The vertical kernel.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, `Auto` or `Fixed`.
pub fn filter_vertically_u8<const N: usize>(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &BlurKernel<N>,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src.size(), dst.size())?;

    let size = src.size();
    let src_data = src.as_slice();
    parallel::for_each_row_with_strategy(dst.as_slice_mut(), size.width, strategy, |r, row| {
        vertical_row(row, r, src_data, size, kernel)
    })?;

    Ok(())
}

/// Convolve every row of an image with a 1D kernel.
///
/// Columns closer than `radius` to the left or right border only use the taps that fall
/// inside the image and are renormalized by the sum of those taps.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The horizontal kernel.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, `Auto` or `Fixed`.
pub fn filter_horizontally_u8<const N: usize>(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &BlurKernel<N>,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src.size(), dst.size())?;

    let width = src.width();
    let src_data = src.as_slice();
    parallel::for_each_row_with_strategy(dst.as_slice_mut(), width, strategy, |r, row| {
        horizontal_row(row, &src_data[r * width..(r + 1) * width], kernel)
    })?;

    Ok(())
}

/// Apply a separable blur with execution strategy control.
///
/// The vertical pass writes `temp`, then the horizontal pass reads `temp` and writes
/// `dst`. No image memory is allocated.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `temp` - Scratch image with shape (H, W, 1) holding the vertical pass result.
/// * `kernel` - The kernel applied along both axes.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, `Auto` or `Fixed`.
///
/// # Errors
///
/// The three images must have the same size.
pub fn separable_blur_u8_with_strategy<const N: usize>(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    temp: &mut Image<u8, 1>,
    kernel: &BlurKernel<N>,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src.size(), dst.size())?;
    check_same_size(src.size(), temp.size())?;

    log::debug!(
        "separable blur of {} with a {}-tap kernel ({:?})",
        src.size(),
        kernel.len(),
        strategy
    );

    let size = src.size();
    let (src, dst, temp) = (src.as_slice(), dst.as_slice_mut(), temp.as_slice_mut());
    parallel::run_with_strategy(strategy, size.num_pixels(), |parallel| {
        separable_blur_slices(dst, src, temp, size, kernel, parallel)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_axis(line: &[u8], kernel: &BlurKernel<5>) -> Vec<u8> {
        // reference straight from the window definition, one tap at a time
        let n = line.len() as isize;
        let radius = kernel.radius() as isize;
        (0..n)
            .map(|p| {
                let mut dot = 0u32;
                let mut sum = 0u32;
                for (i, &w) in kernel.weights().iter().enumerate() {
                    let q = p + i as isize - radius;
                    if (0..n).contains(&q) {
                        dot += line[q as usize] as u32 * w;
                        sum += w;
                    }
                }
                if sum == kernel.sum() {
                    ((dot + kernel.rounding()) >> kernel.shift()) as u8
                } else {
                    (dot as f32 / sum as f32 + 0.5) as u8
                }
            })
            .collect()
    }

    #[test]
    fn test_vertical_pass_column() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            [1, 6].into(),
            vec![
                10,
                20,
                30,
                40,
                50,
                60,
            ],
        )?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        filter_vertically_u8(&src, &mut dst, &BlurKernel::BINOMIAL_5, ExecutionStrategy::Serial)?;

        // row 0: (60 + 80 + 30) / 11 = 15.45
        // row 1: (40 + 120 + 120 + 40) / 15 = 21.33
        // row 2: (10 + 80 + 180 + 160 + 50) / 16 = 30
        // row 3: (20 + 120 + 240 + 200 + 60) / 16 = 40
        // row 4: (30 + 160 + 300 + 240) / 15 = 48.67
        // row 5: (40 + 200 + 360) / 11 = 54.55
        assert_eq!(dst.as_slice(), &[15, 21, 30, 40, 49, 55]);
        Ok(())
    }

    #[test]
    fn test_horizontal_pass_row() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::new([6, 1].into(), vec![10, 20, 30, 40, 50, 60])?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        filter_horizontally_u8(&src, &mut dst, &BlurKernel::BINOMIAL_5, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[15, 21, 30, 40, 49, 55]);
        Ok(())
    }

    fn check_passes_match_naive_reference(size: ImageSize) -> Result<(), FilterError> {
        let kernel = BlurKernel::BINOMIAL_5;
        let data = (0..size.num_pixels())
            .map(|i| ((i * 37 + 11) % 256) as u8)
            .collect::<Vec<_>>();
        let src = Image::<u8, 1>::new(size, data)?;

        let mut vertical = Image::from_size_val(size, 0u8)?;
        filter_vertically_u8(&src, &mut vertical, &kernel, ExecutionStrategy::Serial)?;
        for c in 0..size.width {
            let column = (0..size.height)
                .map(|r| src.as_slice()[r * size.width + c])
                .collect::<Vec<_>>();
            let expected = naive_axis(&column, &kernel);
            for (r, &v) in expected.iter().enumerate() {
                assert_eq!(
                    vertical.as_slice()[r * size.width + c],
                    v,
                    "{size}: ({r}, {c})"
                );
            }
        }

        let mut horizontal = Image::from_size_val(size, 0u8)?;
        filter_horizontally_u8(&src, &mut horizontal, &kernel, ExecutionStrategy::Serial)?;
        for (r, row) in src.as_slice().chunks_exact(size.width).enumerate() {
            let expected = naive_axis(row, &kernel);
            assert_eq!(
                &horizontal.as_slice()[r * size.width..(r + 1) * size.width],
                expected.as_slice(),
                "{size}: row {r}"
            );
        }

        Ok(())
    }

    #[test]
    fn test_passes_match_naive_reference() -> Result<(), FilterError> {
        check_passes_match_naive_reference(ImageSize {
            width: 9,
            height: 7,
        })
    }

    #[test]
    fn test_passes_match_naive_reference_short_axes() -> Result<(), FilterError> {
        // up to 2 * radius samples there is no interior, only the two border regions
        for width in 1..=6 {
            for height in 1..=6 {
                check_passes_match_naive_reference(ImageSize { width, height })?;
            }
        }
        Ok(())
    }

    #[test]
    fn test_separable_blur_is_vertical_then_horizontal() -> Result<(), FilterError> {
        let kernel = BlurKernel::BINOMIAL_5;
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let data = (0..size.num_pixels())
            .map(|i| ((i * 91 + 7) % 256) as u8)
            .collect::<Vec<_>>();
        let src = Image::<u8, 1>::new(size, data)?;

        let mut vertical = Image::from_size_val(size, 0u8)?;
        let mut expected = Image::from_size_val(size, 0u8)?;
        filter_vertically_u8(&src, &mut vertical, &kernel, ExecutionStrategy::Serial)?;
        filter_horizontally_u8(&vertical, &mut expected, &kernel, ExecutionStrategy::Serial)?;

        let mut dst = Image::from_size_val(size, 0u8)?;
        let mut temp = Image::from_size_val(size, 0u8)?;
        separable_blur_u8_with_strategy(
            &src,
            &mut dst,
            &mut temp,
            &kernel,
            ExecutionStrategy::Serial,
        )?;

        assert_eq!(temp, vertical);
        assert_eq!(dst, expected);
        Ok(())
    }

    #[test]
    fn test_separable_blur_with_strategy() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 13,
            height: 11,
        };
        let data = (0..size.num_pixels())
            .map(|i| ((i * 53 + 3) % 256) as u8)
            .collect::<Vec<_>>();
        let src = Image::<u8, 1>::new(size, data)?;

        let mut outputs = vec![];
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::Parallel,
            ExecutionStrategy::Auto,
            ExecutionStrategy::Fixed(3),
        ] {
            let mut dst = Image::from_size_val(size, 0u8)?;
            let mut temp = Image::from_size_val(size, 0u8)?;
            separable_blur_u8_with_strategy(
                &src,
                &mut dst,
                &mut temp,
                &BlurKernel::BINOMIAL_5,
                strategy,
            )?;
            outputs.push(dst);
        }

        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
        Ok(())
    }

    #[test]
    fn test_separable_blur_size_mismatch() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let mut temp = Image::<u8, 1>::from_size_val([4, 3].into(), 0)?;

        let res = separable_blur_u8_with_strategy(
            &src,
            &mut dst,
            &mut temp,
            &BlurKernel::BINOMIAL_5,
            ExecutionStrategy::Serial,
        );
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::InvalidImageSize(4, 4, 4, 3)))
        );
        Ok(())
    }

    #[test]
    fn test_separable_blur_fixed_zero_threads() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let mut dst = src.clone();
        let mut temp = src.clone();

        let res = separable_blur_u8_with_strategy(
            &src,
            &mut dst,
            &mut temp,
            &BlurKernel::BINOMIAL_5,
            ExecutionStrategy::Fixed(0),
        );
        assert_eq!(
            res,
            Err(FilterError::Parallel(
                crate::parallel::ParallelError::InvalidThreadCount(0)
            ))
        );
        Ok(())
    }
}
