use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use sepblur_image::{Image, ImageSize};

use crate::error::IoError;

/// Largest width or height accepted by default when reading a PGM file.
pub const DEFAULT_PGM_MAX_SIZE: usize = 8192;

const PGM_MAGIC: &str = "P5";
const PGM_MAX_VALUE: i64 = 255;

/// Header fields of a binary graymap, as read from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PgmHeader {
    width: i64,
    height: i64,
    max_value: i64,
}

/// Reads the whitespace separated header fields of a PGM stream.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

// C locale `isspace`, which unlike `u8::is_ascii_whitespace` includes vertical tab.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_space(&mut self) {
        while self.pos < self.bytes.len() && is_space(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Next run of non-whitespace bytes.
    fn token(&mut self) -> &'a [u8] {
        self.skip_space();
        let start = self.pos;
        while self.pos < self.bytes.len() && !is_space(self.bytes[self.pos]) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    /// Next optionally signed decimal integer, stopping at the first non-digit.
    fn integer(&mut self, field: &'static str) -> Result<i64, IoError> {
        self.skip_space();
        let negative = match self.bytes.get(self.pos) {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        // `int` range: the magnitude of a negative value may be one larger
        let limit = if negative {
            i32::MAX as i64 + 1
        } else {
            i32::MAX as i64
        };

        let start = self.pos;
        let mut value = 0i64;
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as i64))
                .filter(|&v| v <= limit)
                .ok_or(IoError::InvalidPgmHeader(field))?;
            self.pos += 1;
        }

        if self.pos == start {
            return Err(IoError::InvalidPgmHeader(field));
        }

        Ok(if negative { -value } else { value })
    }

    /// The byte right after the last field, without skipping whitespace.
    fn byte(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied();
        self.pos += b.is_some() as usize;
        b
    }
}

/// Parse and validate the header, returning the image size and the offset of the pixels.
fn parse_header(bytes: &[u8], max_size: usize) -> Result<(ImageSize, usize), IoError> {
    let mut reader = HeaderReader::new(bytes);

    let magic = reader.token();
    if magic != PGM_MAGIC.as_bytes() {
        return Err(IoError::InvalidPgmMagic(
            String::from_utf8_lossy(magic).into_owned(),
        ));
    }

    let header = PgmHeader {
        width: reader.integer("width")?,
        height: reader.integer("height")?,
        max_value: reader.integer("max value")?,
    };
    let terminator = reader.byte();

    let in_range = |side: i64| side >= 1 && side as u64 <= max_size as u64;
    if !in_range(header.width) || !in_range(header.height) {
        return Err(IoError::InvalidPgmDimensions {
            width: header.width,
            height: header.height,
            max_size,
        });
    }

    if !(0..=PGM_MAX_VALUE).contains(&header.max_value) {
        return Err(IoError::InvalidPgmMaxValue(header.max_value));
    }

    if terminator != Some(b'\n') {
        return Err(IoError::MissingPgmHeaderTerminator);
    }

    let size = ImageSize {
        width: header.width as usize,
        height: header.height as usize,
    };

    Ok((size, reader.pos))
}

/// Decodes a binary PGM (P5) image from memory.
///
/// The header is `P5`, the width, the height and the maximum gray value, separated by
/// whitespace and followed by exactly one `\n`. Then `width * height` pixel bytes follow
/// in row-major order. Bytes after the pixels are ignored, and so is the maximum gray
/// value once it has been checked to lie in `[0, 255]`.
///
/// # Arguments
///
/// * `bytes` - The encoded image.
/// * `max_size` - Largest accepted width or height.
///
/// # Returns
///
/// A grayscale image with the dimensions read from the header.
pub fn decode_image_pgm_mono8(bytes: &[u8], max_size: usize) -> Result<Image<u8, 1>, IoError> {
    let (size, offset) = parse_header(bytes, max_size)?;

    let expected = size.num_pixels();
    let pixels = &bytes[offset..];
    if pixels.len() < expected {
        return Err(IoError::TruncatedPgmData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(Image::new(size, pixels[..expected].to_vec())?)
}

/// Reads a binary PGM (P5) image from a file.
///
/// See [`decode_image_pgm_mono8`] for the accepted format.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
/// * `max_size` - Largest accepted width or height, usually [`DEFAULT_PGM_MAX_SIZE`].
///
/// # Returns
///
/// A grayscale image with the dimensions read from the header.
pub fn read_image_pgm_mono8(
    file_path: impl AsRef<Path>,
    max_size: usize,
) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    let image = decode_image_pgm_mono8(&bytes, max_size)?;
    log::debug!("read {} from {}", image.size(), file_path.display());

    Ok(image)
}

/// Encodes a grayscale image as a binary PGM (P5) stream.
///
/// The header is always `P5\n{width} {height}\n255\n`.
pub fn encode_image_pgm_mono8(image: &Image<u8, 1>) -> Vec<u8> {
    let header = format!("{PGM_MAGIC}\n{} {}\n{PGM_MAX_VALUE}\n", image.width(), image.height());

    let mut buf = Vec::with_capacity(header.len() + image.as_slice().len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(image.as_slice());
    buf
}

/// Writes a grayscale image to a binary PGM (P5) file.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file, created or truncated.
/// * `image` - The image to write.
pub fn write_image_pgm_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let mut writer = BufWriter::new(File::create(file_path)?);
    writer.write_all(&encode_image_pgm_mono8(image))?;
    writer.flush()?;

    log::debug!("wrote {} to {}", image.size(), file_path.display());

    Ok(())
}
