mod decode;
pub mod dxt;
mod format;
pub mod swizzle;

pub use decode::{DecodeError, RasterBuffer, TextureDescriptor, decode};
pub use format::{PixelFormat, TILE_ALIGN, align_to_tile, is_supported};
