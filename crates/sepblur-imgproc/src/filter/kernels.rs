use super::FilterError;

/// Largest kernel weight sum accepted by [`BlurKernel::new`].
///
/// Keeps `255 * sum` below `2^24`, so border dot products are exact in `f32`.
pub const MAX_KERNEL_SUM: u32 = 1 << 16;

/// An odd-length, symmetric integer kernel whose weights sum to a power of two.
///
/// The power-of-two sum lets interior pixels be normalized with a shift instead of a
/// division. Border pixels only see part of the kernel and are renormalized by the
/// sum of the taps that were actually used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurKernel<const N: usize> {
    weights: [u32; N],
    radius: usize,
    shift: u32,
}

impl BlurKernel<5> {
    /// The 5-tap binomial kernel `[1, 4, 6, 4, 1]`, radius 2, shift 4.
    pub const BINOMIAL_5: Self = Self {
        weights: [1, 4, 6, 4, 1],
        radius: 2,
        shift: 4,
    };
}

impl<const N: usize> BlurKernel<N> {
    /// Create a kernel from its weights.
    ///
    /// # Arguments
    ///
    /// * `weights` - The kernel taps, ordered from the leading to the trailing side.
    ///
    /// # Errors
    ///
    /// The kernel must have an odd length, be a palindrome and its weights must sum to a
    /// power of two no larger than [`MAX_KERNEL_SUM`].
    ///
    /// # Example
    ///
    /// ```
    /// use sepblur_imgproc::filter::kernels::BlurKernel;
    ///
    /// let kernel = BlurKernel::new([1, 2, 1]).unwrap();
    /// assert_eq!(kernel.radius(), 1);
    /// assert_eq!(kernel.shift(), 2);
    /// assert_eq!(kernel.rounding(), 2);
    /// ```
    pub fn new(weights: [u32; N]) -> Result<Self, FilterError> {
        if N % 2 == 0 {
            return Err(FilterError::EvenKernelLength(N));
        }

        if weights.iter().ne(weights.iter().rev()) {
            return Err(FilterError::AsymmetricKernel);
        }

        let sum = weights.iter().map(|&w| w as u64).sum::<u64>();
        if sum > MAX_KERNEL_SUM as u64 {
            return Err(FilterError::KernelSumTooLarge(sum));
        }

        let sum = sum as u32;
        if !sum.is_power_of_two() {
            return Err(FilterError::KernelSumNotPowerOfTwo(sum));
        }

        Ok(Self {
            weights,
            radius: N / 2,
            shift: sum.trailing_zeros(),
        })
    }

    /// The kernel taps.
    pub fn weights(&self) -> &[u32; N] {
        &self.weights
    }

    /// Number of taps on each side of the center tap.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        N
    }

    /// Always false, a valid kernel has at least one tap.
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Right shift equivalent to dividing by the full kernel sum.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Bias added before the shift to round half up.
    pub fn rounding(&self) -> u32 {
        match self.shift {
            0 => 0,
            s => 1 << (s - 1),
        }
    }

    /// Sum of all the weights, equal to `1 << shift`.
    pub fn sum(&self) -> u32 {
        1 << self.shift
    }

    /// Normalize a full-kernel dot product with integer arithmetic.
    #[inline]
    pub fn round_shifted(&self, dot: u32) -> u8 {
        ((dot + self.rounding()) >> self.shift) as u8
    }

    /// Region of position `p` along an axis with `extent` samples.
    #[inline]
    pub fn region(&self, p: usize, extent: usize) -> Region {
        if p < self.radius {
            Region::Leading
        } else if p + self.radius >= extent {
            Region::Trailing
        } else {
            Region::Interior
        }
    }

    /// The in-bounds taps for output position `p` along an axis with `extent` samples.
    ///
    /// `p` must be smaller than `extent`.
    #[inline]
    pub fn window(&self, p: usize, extent: usize) -> TapWindow<'_> {
        let region = self.region(p, extent);
        let (start, taps) = match region {
            // the kernel runs off the leading edge: drop its head
            Region::Leading => {
                let last = (p + self.radius).min(extent - 1);
                let offset = self.radius - p;
                (0, &self.weights[offset..offset + last + 1])
            }
            Region::Interior => (p - self.radius, &self.weights[..]),
            // the kernel runs off the trailing edge: drop its tail
            Region::Trailing => {
                let start = p - self.radius;
                (start, &self.weights[..extent - start])
            }
        };

        TapWindow {
            region,
            start,
            sum: taps.iter().sum(),
            taps,
        }
    }
}

/// Where an output position lies relative to the borders of its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Top rows or left columns, closer than `radius` to the first sample.
    Leading,
    /// Positions where the whole kernel fits.
    Interior,
    /// Bottom rows or right columns, closer than `radius` to the last sample.
    Trailing,
}

/// The taps of a kernel that fall inside the image for one output position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapWindow<'a> {
    /// Region the output position belongs to.
    pub region: Region,
    /// Index along the axis of the sample multiplied by `taps[0]`.
    pub start: usize,
    /// The weights actually applied.
    pub taps: &'a [u32],
    /// Sum of `taps`.
    pub sum: u32,
}

impl TapWindow<'_> {
    /// Convolve the window with the samples returned by `sample`, indexed along the axis.
    #[inline]
    pub fn apply<const N: usize>(
        &self,
        kernel: &BlurKernel<N>,
        sample: impl Fn(usize) -> u8,
    ) -> u8 {
        let dot = self
            .taps
            .iter()
            .enumerate()
            .map(|(i, &w)| sample(self.start + i) as u32 * w)
            .sum::<u32>();

        match self.region {
            Region::Interior => kernel.round_shifted(dot),
            Region::Leading | Region::Trailing => round_renormalized(dot, self.sum),
        }
    }
}

/// Normalize a truncated-kernel dot product by the weights used, rounding half up.
///
/// Computed in floating point as `floor(dot / sum + 0.5)`.
#[inline]
pub fn round_renormalized(dot: u32, sum: u32) -> u8 {
    (dot as f32 / sum as f32 + 0.5) as u8
}
