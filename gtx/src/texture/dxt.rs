//! Decoding of DXT (S3TC) 4x4 blocks
//!
//! Color halves are 8 bytes: two 5-6-5 endpoints followed by 16 2-bit
//! selectors. Alpha halves are 8 bytes: two 8-bit endpoints followed by 16
//! 3-bit selectors. Texels are numbered row-major inside the block.
//!
//! # Related Links
//! * <https://www.khronos.org/registry/OpenGL/extensions/EXT/EXT_texture_compression_s3tc.txt> - Description of the DXT compression OpenGL extensions.

pub type Rgba = [u8; 4];
type Rgb = [u8; 3];

pub const TEXELS_PER_BLOCK: usize = 16;

/// How the color half of a block treats its fourth palette entry when
/// `color0 <= color1`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ColorMode {
    /// Three colors plus opaque black.
    Opaque,
    /// Three colors plus transparent black.
    PunchThrough,
    /// Color half of a block that carries its own alpha. Code 3 is always the
    /// 1:2 blend; code 2 still halves when `color0 <= color1`.
    SeparateAlpha,
}

macro_rules! to_bit8 {
    (5,$val:expr) => {{
        let val = $val as u8;
        val << 3 | val >> 2
    }};
    (6,$val:expr) => {{
        let val = $val as u8;
        val << 2 | val >> 4
    }};
}

/// Expands a 5-6-5 packed color to 8 bits per channel by bit replication,
/// so 0x1F maps to 0xFF and 0x00 to 0x00.
#[inline]
fn enc565_decode(value: u16) -> Rgb {
    [
        to_bit8!(5, (value >> 11) & 0x1F),
        to_bit8!(6, (value >> 5) & 0x3F),
        to_bit8!(5, value & 0x1F),
    ]
}

#[inline]
fn blend(a: Rgb, b: Rgb, wa: u16, wb: u16) -> Rgb {
    let div = wa + wb;
    let mut out = [0; 3];
    for i in 0..3 {
        out[i] = ((u16::from(a[i]) * wa + u16::from(b[i]) * wb) / div) as u8;
    }
    out
}

#[inline]
fn rgba(rgb: Rgb, alpha: u8) -> Rgba {
    [rgb[0], rgb[1], rgb[2], alpha]
}

fn color_palette(color0: u16, color1: u16, mode: ColorMode) -> [Rgba; 4] {
    let c0 = enc565_decode(color0);
    let c1 = enc565_decode(color1);
    let four_color = color0 > color1;

    let third = if four_color {
        blend(c0, c1, 2, 1)
    } else {
        blend(c0, c1, 1, 1)
    };

    let fourth = if four_color || mode == ColorMode::SeparateAlpha {
        rgba(blend(c0, c1, 1, 2), u8::MAX)
    } else if mode == ColorMode::PunchThrough {
        [0, 0, 0, 0]
    } else {
        [0, 0, 0, u8::MAX]
    };

    [
        rgba(c0, u8::MAX),
        rgba(c1, u8::MAX),
        rgba(third, u8::MAX),
        fourth,
    ]
}

/// Decodes an 8-byte color half into 16 texels. Alpha is 255 unless
/// `mode` is [`ColorMode::PunchThrough`] and a texel selects the
/// transparent entry.
pub fn decode_color_block(source: &[u8; 8], mode: ColorMode) -> [Rgba; TEXELS_PER_BLOCK] {
    let color0 = u16::from_le_bytes([source[0], source[1]]);
    let color1 = u16::from_le_bytes([source[2], source[3]]);
    let selectors = u32::from_le_bytes([source[4], source[5], source[6], source[7]]);

    let palette = color_palette(color0, color1, mode);

    let mut out = [[0; 4]; TEXELS_PER_BLOCK];
    for (i, texel) in out.iter_mut().enumerate() {
        *texel = palette[(selectors >> (i * 2)) as usize & 3];
    }
    out
}

/// Builds the 8-entry alpha palette.
/// if alpha0 > alpha1: [a0, a1, 6 values stepping from a0 to a1]
/// otherwise: [a0, a1, 4 values stepping from a0 to a1, 0, 0xFF]
pub fn alpha_table(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let mut table = [alpha0, alpha1, 0, 0, 0, 0, 0, 0xFF];
    if alpha0 > alpha1 {
        for i in 2..8u16 {
            table[i as usize] =
                (((8 - i) * u16::from(alpha0) + (i - 1) * u16::from(alpha1)) / 7) as u8;
        }
    } else {
        for i in 2..6u16 {
            table[i as usize] =
                (((6 - i) * u16::from(alpha0) + (i - 1) * u16::from(alpha1)) / 5) as u8;
        }
    }
    table
}

/// 3-bit alpha selector of texel `index`. Selectors straddle byte
/// boundaries, so the six code bytes are read as one little endian 48-bit
/// value.
#[inline]
fn alpha_code(codes: &[u8], index: usize) -> usize {
    let bits = codes.iter().rev().fold(0, |t, &b| (t << 8) | u64::from(b));
    (bits >> (index * 3)) as usize & 7
}

/// Decodes an 8-byte alpha half into 16 alpha values.
pub fn decode_alpha_block(source: &[u8; 8]) -> [u8; TEXELS_PER_BLOCK] {
    let table = alpha_table(source[0], source[1]);
    let mut out = [0; TEXELS_PER_BLOCK];
    for (i, alpha) in out.iter_mut().enumerate() {
        *alpha = table[alpha_code(&source[2..8], i)];
    }
    out
}

#[inline]
fn split_block(source: &[u8; 16]) -> ([u8; 8], [u8; 8]) {
    let mut alpha = [0; 8];
    let mut color = [0; 8];
    alpha.copy_from_slice(&source[..8]);
    color.copy_from_slice(&source[8..]);
    (alpha, color)
}

/// Decodes a 16-byte DXT5 block (alpha half first) into 16 RGBA texels.
pub fn decode_block(source: &[u8; 16]) -> [Rgba; TEXELS_PER_BLOCK] {
    let (alpha, color) = split_block(source);
    let mut texels = decode_color_block(&color, ColorMode::SeparateAlpha);
    let alphas = decode_alpha_block(&alpha);
    for (texel, alpha) in texels.iter_mut().zip(alphas) {
        texel[3] = alpha;
    }
    texels
}

/// Decodes the single texel at column `i`, row `j` of a DXT5 block.
/// Only the low two bits of each coordinate are used.
pub fn decode_texel(source: &[u8; 16], i: usize, j: usize) -> Rgba {
    let index = (j & 3) * 4 + (i & 3);
    let (alpha, color) = split_block(source);

    let color0 = u16::from_le_bytes([color[0], color[1]]);
    let color1 = u16::from_le_bytes([color[2], color[3]]);
    let selectors = u32::from_le_bytes([color[4], color[5], color[6], color[7]]);
    let palette = color_palette(color0, color1, ColorMode::SeparateAlpha);

    let mut texel = palette[(selectors >> (index * 2)) as usize & 3];
    texel[3] = alpha_table(alpha[0], alpha[1])[alpha_code(&alpha[2..8], index)];
    texel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn color_half(color0: u16, color1: u16, selectors: u32) -> [u8; 8] {
        let mut block = [0; 8];
        block[0..2].copy_from_slice(&color0.to_le_bytes());
        block[2..4].copy_from_slice(&color1.to_le_bytes());
        block[4..8].copy_from_slice(&selectors.to_le_bytes());
        block
    }

    fn alpha_half(alpha0: u8, alpha1: u8, codes: [u8; 16]) -> [u8; 8] {
        let bits = codes
            .iter()
            .enumerate()
            .fold(0u64, |bits, (i, &c)| bits | (u64::from(c & 7) << (i * 3)));
        let mut block = [0; 8];
        block[0] = alpha0;
        block[1] = alpha1;
        block[2..8].copy_from_slice(&bits.to_le_bytes()[..6]);
        block
    }

    fn full_block(alpha: [u8; 8], color: [u8; 8]) -> [u8; 16] {
        let mut block = [0; 16];
        block[..8].copy_from_slice(&alpha);
        block[8..].copy_from_slice(&color);
        block
    }

    // every texel uses selector `code`
    fn uniform_selectors(code: u32) -> u32 {
        (0..16).fold(0, |bits, i| bits | (code << (i * 2)))
    }

    #[rstest]
    #[case(0x0000, [0x00, 0x00, 0x00])]
    #[case(0xFFFF, [0xFF, 0xFF, 0xFF])]
    #[case(0xF800, [0xFF, 0x00, 0x00])]
    #[case(0x07E0, [0x00, 0xFF, 0x00])]
    #[case(0x001F, [0x00, 0x00, 0xFF])]
    #[case(0x8410, [0x84, 0x82, 0x84])]
    fn expands_565_by_replication(#[case] packed: u16, #[case] expected: Rgb) {
        assert_eq!(enc565_decode(packed), expected);
    }

    #[rstest]
    #[case(ColorMode::Opaque)]
    #[case(ColorMode::PunchThrough)]
    #[case(ColorMode::SeparateAlpha)]
    fn equal_endpoints_except_black_slot(#[case] mode: ColorMode) {
        let color = 0x8410;
        let expected = [0x84, 0x82, 0x84, 0xFF];
        for code in 0..3 {
            let block = color_half(color, color, uniform_selectors(code));
            let texels = decode_color_block(&block, mode);
            assert!(texels.iter().all(|t| *t == expected), "code {code} in {mode:?}");
        }
    }

    #[test]
    fn equal_endpoints_with_separate_alpha_are_uniform() {
        let color = 0x8410;
        let expected = [0x84, 0x82, 0x84, 0xFF];
        for code in 0..4 {
            let texels = decode_color_block(
                &color_half(color, color, uniform_selectors(code)),
                ColorMode::SeparateAlpha,
            );
            assert!(texels.iter().all(|t| *t == expected), "code {code}");
        }
    }

    #[test]
    fn four_color_palette_when_color0_greater() {
        // white over black
        let texels = decode_color_block(
            &color_half(0xFFFF, 0x0000, 0b11_10_01_00),
            ColorMode::Opaque,
        );
        assert_eq!(texels[0], [255, 255, 255, 255]);
        assert_eq!(texels[1], [0, 0, 0, 255]);
        assert_eq!(texels[2], [170, 170, 170, 255]);
        assert_eq!(texels[3], [85, 85, 85, 255]);
        assert!(texels[4..].iter().all(|t| *t == [255, 255, 255, 255]));
    }

    #[test]
    fn three_color_palette_when_color0_not_greater() {
        // black then white, midpoint truncates
        let texels = decode_color_block(&color_half(0x0000, 0xFFFF, 0b10), ColorMode::Opaque);
        assert_eq!(texels[0], [127, 127, 127, 255]);
        assert_eq!(texels[1], [0, 0, 0, 255]);
    }

    #[test]
    fn opaque_black_slot_keeps_alpha() {
        let texels = decode_color_block(
            &color_half(0x001F, 0xF800, uniform_selectors(3)),
            ColorMode::Opaque,
        );
        assert!(texels.iter().all(|t| *t == [0, 0, 0, 255]));
    }

    #[test]
    fn punch_through_black_slot_is_transparent() {
        let texels = decode_color_block(
            &color_half(0x001F, 0xF800, uniform_selectors(3)),
            ColorMode::PunchThrough,
        );
        assert!(texels.iter().all(|t| *t == [0, 0, 0, 0]));
    }

    #[test]
    fn separate_alpha_code3_blends_even_when_color0_not_greater() {
        let texels = decode_color_block(
            &color_half(0x0000, 0xFFFF, uniform_selectors(3)),
            ColorMode::SeparateAlpha,
        );
        assert!(texels.iter().all(|t| *t == [170, 170, 170, 255]));
    }

    #[test]
    fn selectors_are_row_major() {
        // texel 5 = column 1, row 1
        let selectors = 1 << (5 * 2);
        let texels = decode_color_block(&color_half(0xFFFF, 0x0000, selectors), ColorMode::Opaque);
        for (i, texel) in texels.iter().enumerate() {
            let expected = if i == 5 { 0 } else { 255 };
            assert_eq!(texel[0], expected, "texel {i}");
        }
    }

    #[test]
    fn alpha_table_eight_step() {
        assert_eq!(
            alpha_table(255, 0),
            [255, 0, 218, 182, 145, 109, 72, 36]
        );
    }

    #[test]
    fn alpha_table_six_step() {
        assert_eq!(alpha_table(0, 255), [0, 255, 51, 102, 153, 204, 0, 255]);
    }

    #[rstest]
    #[case(0, 255)]
    #[case(1, 0)]
    #[case(7, 36)]
    fn alpha_boundary_values(#[case] code: u8, #[case] expected: u8) {
        let alphas = decode_alpha_block(&alpha_half(255, 0, [code; 16]));
        assert!(alphas.iter().all(|a| *a == expected));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 10)]
    #[case(100, 200)]
    #[case(255, 255)]
    fn degenerate_alpha_codes(#[case] alpha0: u8, #[case] alpha1: u8) {
        let table = alpha_table(alpha0, alpha1);
        assert_eq!(table[6], 0);
        assert_eq!(table[7], 255);
    }

    #[test]
    fn alpha_codes_cross_byte_boundaries() {
        // texels 2 and 5 straddle the first and second code bytes
        let mut codes = [0; 16];
        codes[2] = 7;
        codes[5] = 5;
        codes[10] = 3;
        codes[15] = 6;
        let alphas = decode_alpha_block(&alpha_half(255, 0, codes));
        let table = alpha_table(255, 0);
        for (i, alpha) in alphas.iter().enumerate() {
            assert_eq!(*alpha, table[codes[i] as usize], "texel {i}");
        }
    }

    #[test]
    fn block_combines_alpha_and_color() {
        let mut codes = [0; 16];
        codes[15] = 1;
        let block = full_block(
            alpha_half(200, 20, codes),
            color_half(0xF800, 0x001F, uniform_selectors(1)),
        );
        let texels = decode_block(&block);
        assert_eq!(texels[0], [0, 0, 255, 200]);
        assert_eq!(texels[15], [0, 0, 255, 20]);
    }

    #[test]
    fn texel_matches_whole_block_decode() {
        let mut codes = [0; 16];
        codes.iter_mut().enumerate().for_each(|(i, c)| *c = (i % 8) as u8);
        let block = full_block(
            alpha_half(30, 220, codes),
            color_half(0x1234, 0xFEDC, 0xE4E4_1B1B),
        );
        let texels = decode_block(&block);
        for j in 0..4 {
            for i in 0..4 {
                assert_eq!(decode_texel(&block, i, j), texels[j * 4 + i], "({i}, {j})");
            }
        }
    }
}
