use std::fmt::{Display, Formatter};

/// Every supported format is tiled in 64x64 pixel macro tiles.
pub const TILE_ALIGN: u32 = 64;

/// Rounds a dimension up to the tiling granularity, `None` on overflow.
#[inline]
pub const fn align_to_tile(value: u32) -> Option<u32> {
    value.checked_next_multiple_of(TILE_ALIGN)
}

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum PixelFormat {
    /// 8 bits per channel, stored one texel per 32-bit word.
    Uncompressed8888,
    /// 4x4 blocks of 16 bytes: an interpolated alpha half followed by a color half.
    BlockCompressedRGBA,
    Unknown(u32),
}

impl From<u32> for PixelFormat {
    fn from(value: u32) -> Self {
        match value {
            PixelFormat::UNCOMPRESSED_8888 => PixelFormat::Uncompressed8888,
            PixelFormat::BLOCK_COMPRESSED_RGBA => PixelFormat::BlockCompressedRGBA,
            _ => PixelFormat::Unknown(value),
        }
    }
}

impl From<PixelFormat> for u32 {
    fn from(value: PixelFormat) -> Self {
        value.code()
    }
}

impl PixelFormat {
    pub const UNCOMPRESSED_8888: u32 = 0x1A;
    pub const BLOCK_COMPRESSED_RGBA: u32 = 0x33;

    #[inline]
    pub fn code(&self) -> u32 {
        match self {
            PixelFormat::Uncompressed8888 => Self::UNCOMPRESSED_8888,
            PixelFormat::BlockCompressedRGBA => Self::BLOCK_COMPRESSED_RGBA,
            PixelFormat::Unknown(code) => *code,
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        !matches!(self, PixelFormat::Unknown(_))
    }

    /// Side length in pixels of one addressable unit: a texel or a block.
    #[inline]
    pub fn block_dim(&self) -> u32 {
        match self {
            PixelFormat::BlockCompressedRGBA => 4,
            _ => 1,
        }
    }

    /// Source bytes per addressable unit.
    #[inline]
    pub fn bytes_per_block(&self) -> usize {
        match self {
            PixelFormat::Uncompressed8888 => 4,
            PixelFormat::BlockCompressedRGBA => 16,
            PixelFormat::Unknown(_) => 0,
        }
    }

    #[inline]
    pub fn tile_align(&self) -> u32 {
        TILE_ALIGN
    }

    /// Number of source bytes a `width` x `height` surface occupies, `None`
    /// when it does not fit in `usize`. Unknown formats have no size.
    pub fn data_size(&self, width: u32, height: u32) -> Option<usize> {
        let dim = self.block_dim();
        let blocks_x = width.div_ceil(dim) as usize;
        let blocks_y = height.div_ceil(dim) as usize;
        blocks_x
            .checked_mul(blocks_y)?
            .checked_mul(self.bytes_per_block())
    }

    /// Whether the tiling permutation is known to be a bijection at this
    /// padded width. Other widths decode, but pixels may land in the wrong
    /// place.
    pub fn is_verified_width(&self, padded_width: u32) -> bool {
        match self {
            PixelFormat::Uncompressed8888 => padded_width.is_power_of_two(),
            PixelFormat::BlockCompressedRGBA => {
                padded_width.is_power_of_two() && padded_width >= 2 * TILE_ALIGN
            }
            PixelFormat::Unknown(_) => false,
        }
    }
}

/// Checks a raw container format code before handing a surface to
/// [`decode`](crate::texture::decode).
#[inline]
pub fn is_supported(format_code: u32) -> bool {
    PixelFormat::from(format_code).is_supported()
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Uncompressed8888 => f.write_str("RGBA8"),
            PixelFormat::BlockCompressedRGBA => f.write_str("DXT5"),
            PixelFormat::Unknown(code) => write!(f, "Unknown(0x{code:X})"),
        }
    }
}
