#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use planefx_image as image;

#[doc(inline)]
pub use planefx_imgproc as imgproc;

#[doc(inline)]
pub use planefx_recipes as recipes;
