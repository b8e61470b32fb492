use crate::texture::dxt;
use crate::texture::format::{PixelFormat, align_to_tile};
use crate::texture::swizzle::{map_compressed, map_uncompressed};
#[cfg(feature = "image")]
use image::RgbaImage;
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Rev;
use std::slice::ChunksExact;

#[derive(Copy, Clone, Eq, PartialEq)]
pub enum DecodeError {
    BufferTooSmall { required: usize, actual: usize },
    UnsupportedFormat(u32),
    UnalignedDimensions { width: u32, height: u32, align: u32 },
    /// The surface or its raster is larger than addressable memory.
    SizeOverflow { width: u32, height: u32 },
    /// The tiling layout addressed unit `index` in a `len`-byte payload.
    /// Happens at widths the layout was never verified for.
    AddressOutOfRange { index: u32, len: usize },
}

impl Debug for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::BufferTooSmall { required, actual } => {
                write!(f, "buffer too small: need {required} bytes, got {actual}")
            }
            DecodeError::UnsupportedFormat(code) => write!(f, "unsupported format 0x{code:X}"),
            DecodeError::UnalignedDimensions {
                width,
                height,
                align,
            } => write!(f, "{width}x{height} is not padded to a multiple of {align}"),
            DecodeError::SizeOverflow { width, height } => {
                write!(f, "{width}x{height} surface size overflows")
            }
            DecodeError::AddressOutOfRange { index, len } => write!(
                f,
                "tiled address {index} lies outside the {len}-byte payload (unverified width)"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// A tiled surface as found in the container. `raw` is borrowed for the
/// duration of one [`decode`] call.
#[derive(Copy, Clone, Debug)]
pub struct TextureDescriptor<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub raw: &'a [u8],
}

impl<'a> TextureDescriptor<'a> {
    #[inline]
    pub fn new<F: Into<PixelFormat>>(
        width: u32,
        height: u32,
        format: F,
        raw: &'a [u8],
    ) -> TextureDescriptor<'a> {
        TextureDescriptor {
            width,
            height,
            format: format.into(),
            raw,
        }
    }

    /// Same surface with both dimensions rounded up to the tiling
    /// granularity. A no-op for already padded surfaces.
    pub fn padded(&self) -> Option<TextureDescriptor<'a>> {
        Some(TextureDescriptor {
            width: align_to_tile(self.width)?,
            height: align_to_tile(self.height)?,
            ..*self
        })
    }

    /// Payload bytes implied by the dimensions, `None` on overflow.
    #[inline]
    pub fn required_size(&self) -> Option<usize> {
        self.format.data_size(self.width, self.height)
    }
}

/// Linear RGBA8 pixels, top row first.
#[derive(Clone, Eq, PartialEq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Debug for RasterBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

impl RasterBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;

    fn zeroed(width: u32, height: u32) -> Option<RasterBuffer> {
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::BYTES_PER_PIXEL)?;
        Some(RasterBuffer {
            width,
            height,
            data: vec![0; len],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn row_len(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.row_len() + x as usize * Self::BYTES_PER_PIXEL;
        self.data[offset..offset + Self::BYTES_PER_PIXEL].try_into().ok()
    }

    #[inline]
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        self.data.chunks_exact(self.row_len().max(1))
    }

    /// Rows starting from the last one, the order BMP stores them in.
    #[inline]
    pub fn rows_bottom_up(&self) -> Rev<ChunksExact<'_, u8>> {
        self.rows().rev()
    }

    /// Top-left `width` x `height` region, clamped to the buffer size.
    /// Used to drop tiling padding.
    pub fn cropped(&self, width: u32, height: u32) -> RasterBuffer {
        let width = width.min(self.width);
        let height = height.min(self.height);
        let len = width as usize * Self::BYTES_PER_PIXEL;
        let data = self
            .rows()
            .take(height as usize)
            .flat_map(|row| &row[..len])
            .copied()
            .collect();
        RasterBuffer {
            width,
            height,
            data,
        }
    }
}

#[cfg(feature = "image")]
impl RasterBuffer {
    #[inline]
    pub fn image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    #[inline]
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

#[inline]
fn read_unit<const N: usize>(raw: &[u8], index: u32) -> Result<[u8; N], DecodeError> {
    let start = index as usize * N;
    raw.get(start..start + N)
        .and_then(|unit| unit.try_into().ok())
        .ok_or(DecodeError::AddressOutOfRange {
            index,
            len: raw.len(),
        })
}

/// Runs `f` over consecutive `band_len`-byte bands of `data`, passing the
/// band number. Bands are disjoint, so they may be filled concurrently.
fn for_each_band<F>(data: &mut [u8], band_len: usize, f: F) -> Result<(), DecodeError>
where
    F: Fn(u32, &mut [u8]) -> Result<(), DecodeError> + Send + Sync,
{
    #[cfg(feature = "multithreaded")]
    let bands = data.par_chunks_mut(band_len);
    #[cfg(not(feature = "multithreaded"))]
    let bands = data.chunks_mut(band_len);

    bands
        .enumerate()
        .try_for_each(|(index, band)| f(index as u32, band))
}

fn decode_rgba8(texture: &TextureDescriptor, out: &mut RasterBuffer) -> Result<(), DecodeError> {
    let width = texture.width;
    let row_len = out.row_len();
    for_each_band(&mut out.data, row_len, |y, row| {
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let index = map_uncompressed(x as u32, y, width);
            // texels are already stored in R, G, B, A byte order
            pixel.copy_from_slice(&read_unit::<4>(texture.raw, index)?);
        }
        Ok(())
    })
}

fn decode_dxt5(texture: &TextureDescriptor, out: &mut RasterBuffer) -> Result<(), DecodeError> {
    const BLOCK: usize = 4;

    let block_width = texture.width / BLOCK as u32;
    let row_len = out.row_len();
    for_each_band(&mut out.data, row_len * BLOCK, |block_y, band| {
        for block_x in 0..block_width {
            let index = map_compressed(block_x, block_y, block_width);
            let texels = dxt::decode_block(&read_unit(texture.raw, index)?);
            for (j, line) in texels.chunks_exact(BLOCK).enumerate() {
                let offset = j * row_len + block_x as usize * BLOCK * 4;
                for (i, texel) in line.iter().enumerate() {
                    band[offset + i * 4..offset + i * 4 + 4].copy_from_slice(texel);
                }
            }
        }
        Ok(())
    })
}

/// Untiles `texture` into a linear raster of the same (padded) size.
///
/// Fails without producing any output when the format is unknown, the
/// dimensions are not padded to the tiling granularity or overflow, `raw` is
/// shorter than the dimensions imply, or the tiling layout addresses past
/// `raw`.
pub fn decode(texture: &TextureDescriptor) -> Result<RasterBuffer, DecodeError> {
    let format = texture.format;
    if let PixelFormat::Unknown(code) = format {
        return Err(DecodeError::UnsupportedFormat(code));
    }

    let align = format.tile_align();
    if texture.width % align != 0 || texture.height % align != 0 {
        return Err(DecodeError::UnalignedDimensions {
            width: texture.width,
            height: texture.height,
            align,
        });
    }

    let overflow = DecodeError::SizeOverflow {
        width: texture.width,
        height: texture.height,
    };
    let required = texture.required_size().ok_or(overflow)?;
    if texture.raw.len() < required {
        return Err(DecodeError::BufferTooSmall {
            required,
            actual: texture.raw.len(),
        });
    }

    let mut out = RasterBuffer::zeroed(texture.width, texture.height).ok_or(overflow)?;
    if out.data.is_empty() {
        return Ok(out);
    }

    match format {
        PixelFormat::Uncompressed8888 => decode_rgba8(texture, &mut out)?,
        PixelFormat::BlockCompressedRGBA => decode_dxt5(texture, &mut out)?,
        PixelFormat::Unknown(code) => return Err(DecodeError::UnsupportedFormat(code)),
    }

    Ok(out)
}
