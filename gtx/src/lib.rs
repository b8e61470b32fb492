//! Wii U GTX texture unpack lib
//!
//! walks `Gfx2` containers and untiles their RGBA8 and DXT5 surfaces into
//! linear RGBA8 rasters
//!
pub mod error;
pub mod reader;
pub mod texture;

pub use error::Error;
pub use reader::Gtx;
pub use texture::{DecodeError, PixelFormat, RasterBuffer, TextureDescriptor, decode, is_supported};
