/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The stream does not start with the `P5` magic token.
    #[error("Invalid PGM magic number. Expected P5, got {0:?}")]
    InvalidPgmMagic(String),

    /// A header field is missing or is not a decimal number.
    #[error("Invalid PGM header. Failed to parse the {0}")]
    InvalidPgmHeader(&'static str),

    /// The image dimensions are not positive or exceed the allowed maximum.
    #[error("Invalid PGM dimensions {width}x{height}, each side must be in [1, {max_size}]")]
    InvalidPgmDimensions {
        /// Width read from the header.
        width: i64,
        /// Height read from the header.
        height: i64,
        /// Largest accepted side.
        max_size: usize,
    },

    /// The maximum gray value is outside `[0, 255]`.
    #[error("Invalid PGM max value {0}, expected a value in [0, 255]")]
    InvalidPgmMaxValue(i64),

    /// The header is not followed by a single newline byte.
    #[error("PGM header must be terminated by a single newline")]
    MissingPgmHeaderTerminator,

    /// The stream holds fewer pixels than the header announces.
    #[error("Truncated PGM data. Expected {expected} bytes, got {actual}")]
    TruncatedPgmData {
        /// Number of pixel bytes announced by the header.
        expected: usize,
        /// Number of pixel bytes available.
        actual: usize,
    },

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] sepblur_image::ImageError),
}
