use argh::FromArgs;
use std::path::PathBuf;

use sepblur::image::Image;
use sepblur::imgproc::{
    filter::{kernels::BlurKernel, separable_blur_u8_with_strategy},
    parallel::ExecutionStrategy,
};
use sepblur::io::pgm::{read_image_pgm_mono8, write_image_pgm_mono8, DEFAULT_PGM_MAX_SIZE};

#[derive(FromArgs)]
/// Blur a binary PGM image with the 5-tap binomial kernel
struct Args {
    /// path to the input PGM image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output PGM image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// largest accepted width or height of the input image
    #[argh(option, default = "DEFAULT_PGM_MAX_SIZE")]
    max_size: usize,

    /// number of worker threads, defaults to the global rayon pool
    #[argh(option)]
    threads: Option<usize>,

    /// run both passes on the calling thread
    #[argh(switch)]
    serial: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image
    let image = read_image_pgm_mono8(&args.input, args.max_size)?;
    log::info!("loaded {} from {}", image.size(), args.input.display());

    let strategy = match (args.serial, args.threads) {
        (true, _) => ExecutionStrategy::Serial,
        (false, Some(n)) => ExecutionStrategy::Fixed(n),
        (false, None) => ExecutionStrategy::Auto,
    };

    // blur the image
    let mut blurred = Image::from_size_val(image.size(), 0u8)?;
    let mut temp = Image::from_size_val(image.size(), 0u8)?;

    let start = std::time::Instant::now();
    separable_blur_u8_with_strategy(
        &image,
        &mut blurred,
        &mut temp,
        &BlurKernel::BINOMIAL_5,
        strategy,
    )?;
    log::info!("blur took {:?} with {:?}", start.elapsed(), strategy);

    // save the result
    write_image_pgm_mono8(&args.output, &blurred)?;
    log::info!("saved {} to {}", blurred.size(), args.output.display());

    Ok(())
}
