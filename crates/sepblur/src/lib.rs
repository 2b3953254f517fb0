#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use sepblur_image as image;

#[doc(inline)]
pub use sepblur_imgproc as imgproc;

#[doc(inline)]
pub use sepblur_io as io;
