use rayon::prelude::*;
use thiserror::Error;

/// Number of pixels from which [`ExecutionStrategy::Auto`] switches to the rayon pool.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the row loops of a filter are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global rayon thread pool to process output rows in parallel.
    Parallel,

    /// Parallel for images with at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serial otherwise.
    #[default]
    Auto,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels runs its rows in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }
}

/// Visit every row of `dst` with its row index.
///
/// `row_len` is the number of elements per row and must divide `dst.len()`.
/// Rows are handed out to the rayon pool when `parallel` is set. The call returns
/// only after every row has been written.
pub(crate) fn for_each_row_mut<T, F>(dst: &mut [T], row_len: usize, parallel: bool, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    if parallel {
        dst.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    } else {
        dst.chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    }
}

fn fixed_pool(n: usize) -> Result<rayon::ThreadPool, ParallelError> {
    if n == 0 {
        return Err(ParallelError::InvalidThreadCount(n));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}

/// Run `op` once under the given execution strategy.
///
/// `op` receives whether its row loops should run in parallel. For
/// [`ExecutionStrategy::Fixed`] a single local pool is built and `op` runs inside it,
/// so every row loop started by `op` shares that pool.
///
/// # Errors
///
/// Only [`ExecutionStrategy::Fixed`] can fail: with a zero thread count or when the
/// local pool cannot be built.
pub fn run_with_strategy<R, F>(
    strategy: ExecutionStrategy,
    num_pixels: usize,
    op: F,
) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce(bool) -> R + Send,
{
    match strategy {
        ExecutionStrategy::Fixed(n) => Ok(fixed_pool(n)?.install(|| op(true))),
        _ => Ok(op(strategy.is_parallel(num_pixels))),
    }
}

/// Visit every row of `dst` following the given execution strategy.
///
/// # Errors
///
/// See [`run_with_strategy`].
pub fn for_each_row_with_strategy<T, F>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    let num_pixels = dst.len();
    run_with_strategy(strategy, num_pixels, |parallel| {
        for_each_row_mut(dst, row_len, parallel, f)
    })
}
