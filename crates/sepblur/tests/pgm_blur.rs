use sepblur::image::Image;
use sepblur::imgproc::filter::{gaussian_blur5_u8, FilterError};
use sepblur::io::pgm::{read_image_pgm_mono8, write_image_pgm_mono8, DEFAULT_PGM_MAX_SIZE};

#[test]
fn blur_pgm_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let input_path = tmp_dir.path().join("input.pgm");
    let output_path = tmp_dir.path().join("output.pgm");

    let mut src = Image::<u8, 1>::from_size_val([7, 7].into(), 100)?;
    src.as_slice_mut()[3 * 7 + 3] = 200;
    write_image_pgm_mono8(&input_path, &src)?;

    let image = read_image_pgm_mono8(&input_path, DEFAULT_PGM_MAX_SIZE)?;
    let mut dst = Image::from_size_val(image.size(), 0u8)?;
    let mut temp = Image::from_size_val(image.size(), 0u8)?;
    gaussian_blur5_u8(&image, &mut dst, &mut temp)?;
    write_image_pgm_mono8(&output_path, &dst)?;

    let blurred = read_image_pgm_mono8(&output_path, DEFAULT_PGM_MAX_SIZE)?;
    assert_eq!(blurred, dst);
    assert_eq!(blurred.as_slice()[3 * 7 + 3], 114);
    assert_eq!(blurred.as_slice()[0], 100);

    let header = b"P5\n7 7\n255\n";
    let bytes = std::fs::read(&output_path)?;
    assert_eq!(&bytes[..header.len()], header);
    assert_eq!(bytes.len(), header.len() + 49);

    Ok(())
}

#[test]
fn blur_single_pixel() -> Result<(), FilterError> {
    let src = Image::<u8, 1>::new([1, 1].into(), vec![93])?;
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    let mut temp = Image::from_size_val(src.size(), 0u8)?;
    gaussian_blur5_u8(&src, &mut dst, &mut temp)?;
    assert_eq!(dst.as_slice(), &[93]);
    Ok(())
}
