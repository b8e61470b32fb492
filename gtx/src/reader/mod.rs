mod accessor;
mod binary;
pub mod gfx2;
mod source;

pub use accessor::Accessor;
pub use binary::BinaryAccessor;
pub use gfx2::{BlockHeader, BlockKind, EXTENSION, FileHeader, Gtx, SurfaceInfo};
pub use source::Source;
