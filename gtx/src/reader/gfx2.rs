//! `Gfx2` container walker.
//!
//! A file is a 32-byte header followed by `BLK{` blocks, each a 32-byte
//! header plus payload. All integers are big endian. Only the surface info and
//! the first image payload are kept.

use crate::error::{Error, Result};
use crate::reader::{Accessor, BinaryAccessor, Source};
use crate::texture::{PixelFormat, RasterBuffer, TextureDescriptor, align_to_tile, decode};
use memmap2::Mmap;
use std::ops::Range;
use std::path::Path;

pub const EXTENSION: &str = "gtx";

const GFX2_MAGIC: [u8; 4] = *b"Gfx2";
const BLOCK_MAGIC: [u8; 4] = *b"BLK{";
const BLOCK_HEADER_SIZE: usize = 0x20;
const SURFACE_INFO_SIZE: usize = 0x9C;
// leading surface fields that are decoded, the rest is mip offsets and registers
const SURFACE_FIELDS_SIZE: usize = 0x40;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FileHeader {
    pub header_size: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub gpu_version: u32,
    pub align_mode: u32,
}

impl FileHeader {
    fn read(accessor: &mut dyn Accessor) -> Result<FileHeader> {
        if accessor.get_magic()? != GFX2_MAGIC {
            return Err(Error::InvalidMagic);
        }
        let header = FileHeader {
            header_size: accessor.get_u32_be()?,
            major_version: accessor.get_u32_be()?,
            minor_version: accessor.get_u32_be()?,
            gpu_version: accessor.get_u32_be()?,
            align_mode: accessor.get_u32_be()?,
        };
        // reserved
        accessor.advance(8)?;
        Ok(header)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BlockKind {
    End,
    Pad,
    SurfaceInfo,
    ImageData,
    MipData,
    Other(u32),
}

impl From<u32> for BlockKind {
    fn from(value: u32) -> Self {
        match value {
            0x01 => BlockKind::End,
            0x02 => BlockKind::Pad,
            0x0B => BlockKind::SurfaceInfo,
            0x0C => BlockKind::ImageData,
            0x0D => BlockKind::MipData,
            _ => BlockKind::Other(value),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BlockHeader {
    pub header_size: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub kind: BlockKind,
    pub data_size: u32,
    pub id: u32,
    pub index: u32,
}

impl BlockHeader {
    fn read(accessor: &mut dyn Accessor) -> Result<BlockHeader> {
        let magic = accessor.get_magic()?;
        if magic != BLOCK_MAGIC {
            return Err(Error::UnexpectedData(format!(
                "block magic {magic:02X?} at {}",
                accessor.pos() - magic.len()
            )));
        }
        Ok(BlockHeader {
            header_size: accessor.get_u32_be()?,
            major_version: accessor.get_u32_be()?,
            minor_version: accessor.get_u32_be()?,
            kind: BlockKind::from(accessor.get_u32_be()?),
            data_size: accessor.get_u32_be()?,
            id: accessor.get_u32_be()?,
            index: accessor.get_u32_be()?,
        })
    }
}

/// Leading fields of a GX2 surface description.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SurfaceInfo {
    pub dim: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_count: u32,
    pub format: PixelFormat,
    pub aa_mode: u32,
    pub usage: u32,
    pub image_size: u32,
    pub image_ptr: u32,
    pub mip_size: u32,
    pub mip_ptr: u32,
    pub tile_mode: u32,
    pub swizzle: u32,
    pub alignment: u32,
    pub pitch: u32,
}

impl SurfaceInfo {
    fn read(accessor: &mut dyn Accessor) -> Result<SurfaceInfo> {
        let info = SurfaceInfo {
            dim: accessor.get_u32_be()?,
            width: accessor.get_u32_be()?,
            height: accessor.get_u32_be()?,
            depth: accessor.get_u32_be()?,
            mip_count: accessor.get_u32_be()?,
            format: PixelFormat::from(accessor.get_u32_be()?),
            aa_mode: accessor.get_u32_be()?,
            usage: accessor.get_u32_be()?,
            image_size: accessor.get_u32_be()?,
            image_ptr: accessor.get_u32_be()?,
            mip_size: accessor.get_u32_be()?,
            mip_ptr: accessor.get_u32_be()?,
            tile_mode: accessor.get_u32_be()?,
            swizzle: accessor.get_u32_be()?,
            alignment: accessor.get_u32_be()?,
            pitch: accessor.get_u32_be()?,
        };
        accessor.advance(SURFACE_INFO_SIZE - SURFACE_FIELDS_SIZE)?;
        Ok(info)
    }

    /// Dimensions rounded up to the tiling granularity.
    pub fn padded_size(&self) -> Result<(u32, u32)> {
        match (align_to_tile(self.width), align_to_tile(self.height)) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(Error::UnexpectedData(format!(
                "surface size {}x{}",
                self.width, self.height
            ))),
        }
    }
}

/// A parsed GTX file. `T` owns the file bytes, a memory map for
/// [`Gtx::open`].
pub struct Gtx<T> {
    data: T,
    header: FileHeader,
    surface: SurfaceInfo,
    image: Range<usize>,
}

impl Gtx<Mmap> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Gtx<Mmap>> {
        Gtx::from_bytes(Source::new(path).open()?)
    }
}

impl<T: AsRef<[u8]>> Gtx<T> {
    pub fn from_bytes(data: T) -> Result<Gtx<T>> {
        let mut accessor = BinaryAccessor::new(data.as_ref());
        let header = FileHeader::read(&mut accessor)?;

        let mut surface = None;
        let mut image = None;

        // a trailing partial block header ends the walk
        while accessor.remaining() >= BLOCK_HEADER_SIZE {
            let block = BlockHeader::read(&mut accessor)?;
            let size = block.data_size as usize;
            match block.kind {
                BlockKind::SurfaceInfo => {
                    if size != SURFACE_INFO_SIZE {
                        return Err(Error::UnexpectedData(format!(
                            "surface info size 0x{size:X}"
                        )));
                    }
                    surface = Some(SurfaceInfo::read(&mut accessor)?);
                }
                BlockKind::ImageData if image.is_none() => {
                    let start = accessor.pos();
                    accessor.advance(size)?;
                    image = Some(start..start + size);
                }
                _ => accessor.skip(size)?,
            }
        }

        let surface = surface.ok_or(Error::MissingSection("surface info"))?;
        let image = image.ok_or(Error::MissingSection("image data"))?;

        Ok(Gtx {
            data,
            header,
            surface,
            image,
        })
    }

    #[inline]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    #[inline]
    pub fn surface(&self) -> &SurfaceInfo {
        &self.surface
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.surface.format
    }

    #[inline]
    pub fn image_data(&self) -> &[u8] {
        &self.data.as_ref()[self.image.clone()]
    }

    /// The image payload described with padded dimensions, ready for
    /// [`decode`].
    pub fn descriptor(&self) -> Result<TextureDescriptor<'_>> {
        let (width, height) = self.surface.padded_size()?;
        Ok(TextureDescriptor::new(
            width,
            height,
            self.surface.format,
            self.image_data(),
        ))
    }

    #[inline]
    pub fn decode(&self) -> Result<RasterBuffer> {
        Ok(decode(&self.descriptor()?)?)
    }
}
