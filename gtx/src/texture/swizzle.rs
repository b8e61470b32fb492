//! Tiled surface addressing.
//!
//! Both mappers take a destination coordinate in the linear raster and return
//! where that unit lives in the tiled source. The bit layout was recovered from
//! sample surfaces and has no closed form, so every XOR term below is
//! load-bearing: reordering or merging them moves pixels.
//!
//! Neither function validates its inputs. Coordinates are expected to be
//! inside a surface padded to [`TILE_ALIGN`](super::TILE_ALIGN).

/// Texel index of pixel `(x, y)` in a tiled 32-bit-per-texel surface of the
/// given padded `width`. Rows are grouped 16 at a time.
#[inline]
pub fn map_uncompressed(x: u32, y: u32, width: u32) -> u32 {
    let mut pos = (y & !15).wrapping_mul(width);
    pos ^= x & 3;
    pos ^= ((x >> 2) & 1) << 3;
    pos ^= ((x >> 3) & 1) << 6;
    pos ^= ((x >> 3) & 1) << 7;
    pos ^= (x & !0xF) << 4;
    pos ^= (y & 1) << 2;
    pos ^= ((y >> 1) & 7) << 4;
    pos ^= (y & 0x10) << 4;
    pos ^= (y & 0x20) << 2;
    pos
}

/// Block index of 4x4 block `(block_x, block_y)` in a tiled block-compressed
/// surface that is `block_width` blocks wide. Block rows are grouped 16 at a
/// time, block columns 32 at a time.
#[inline]
pub fn map_compressed(block_x: u32, block_y: u32, block_width: u32) -> u32 {
    let (x, y) = (block_x, block_y);
    let mut pos = (y >> 4).wrapping_mul(block_width.wrapping_mul(16));
    pos ^= y & 1;
    pos ^= (x & 7) << 1;
    pos ^= (x & 8) << 1;
    pos ^= (x & 8) << 2;
    pos ^= (x & 0x10) << 2;
    pos ^= (x & !0x1F) << 4;
    pos ^= (y & 2) << 6;
    pos ^= (y & 4) << 6;
    pos ^= (y & 8) << 1;
    pos ^= (y & 0x10) << 2;
    pos ^= y & 0x20;
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_permutation<F: Fn(u32, u32) -> u32>(width: u32, height: u32, map: F) {
        let total = (width * height) as usize;
        let mut seen = vec![false; total];
        for y in 0..height {
            for x in 0..width {
                let pos = map(x, y) as usize;
                assert!(pos < total, "({x}, {y}) maps outside the surface: {pos}");
                assert!(!seen[pos], "({x}, {y}) collides at {pos}");
                seen[pos] = true;
            }
        }
    }

    #[rstest]
    #[case(0, 0, 64, 0)]
    #[case(1, 0, 64, 1)]
    #[case(4, 0, 64, 8)]
    #[case(8, 0, 64, 192)]
    #[case(0, 1, 64, 4)]
    #[case(0, 2, 64, 16)]
    #[case(16, 0, 64, 256)]
    #[case(0, 16, 64, 1280)]
    #[case(0, 32, 64, 2176)]
    #[case(5, 3, 64, 29)]
    #[case(63, 63, 64, 3647)]
    #[case(100, 200, 2048, 394824)]
    #[case(2047, 511, 2048, 1048127)]
    fn uncompressed_fixed_positions(
        #[case] x: u32,
        #[case] y: u32,
        #[case] width: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(map_uncompressed(x, y, width), expected);
    }

    #[rstest]
    #[case(0, 0, 128, 0)]
    #[case(1, 0, 128, 2)]
    #[case(8, 0, 128, 48)]
    #[case(16, 0, 128, 64)]
    #[case(32, 0, 128, 512)]
    #[case(0, 1, 128, 1)]
    #[case(0, 2, 128, 128)]
    #[case(0, 4, 128, 256)]
    #[case(0, 8, 128, 16)]
    #[case(0, 16, 128, 2112)]
    #[case(0, 32, 128, 4128)]
    #[case(3, 5, 128, 263)]
    #[case(31, 15, 128, 495)]
    #[case(127, 79, 128, 10223)]
    #[case(200, 100, 512, 52496)]
    fn compressed_fixed_positions(
        #[case] x: u32,
        #[case] y: u32,
        #[case] block_width: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(map_compressed(x, y, block_width), expected);
    }

    #[rstest]
    #[case(64, 64)]
    #[case(128, 64)]
    #[case(256, 320)]
    #[case(512, 128)]
    #[case(2048, 128)]
    fn uncompressed_is_permutation(#[case] width: u32, #[case] height: u32) {
        assert_permutation(width, height, |x, y| map_uncompressed(x, y, width));
    }

    // 512x320 and 2048x512 are the sizes the layout was recovered from.
    #[rstest]
    #[case(512, 320)]
    #[case(2048, 512)]
    #[case(128, 64)]
    #[case(1024, 256)]
    fn compressed_is_permutation(#[case] width: u32, #[case] height: u32) {
        let (bw, bh) = (width / 4, height / 4);
        assert_permutation(bw, bh, |x, y| map_compressed(x, y, bw));
    }

    #[test]
    fn uncompressed_collides_on_non_power_of_two_width() {
        let width = 192;
        let mut seen = std::collections::HashSet::new();
        let unique = (0..64)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .all(|(x, y)| seen.insert(map_uncompressed(x, y, width)));
        assert!(!unique);
    }

    #[test]
    fn compressed_collides_on_384_wide_surface() {
        let (bw, bh) = (384 / 4, 256 / 4);
        let mut seen = std::collections::HashSet::new();
        let unique = (0..bh)
            .flat_map(|y| (0..bw).map(move |x| (x, y)))
            .all(|(x, y)| seen.insert(map_compressed(x, y, bw)));
        assert!(!unique);
    }

    #[test]
    fn total_over_extreme_inputs() {
        map_uncompressed(u32::MAX, u32::MAX, u32::MAX);
        map_compressed(u32::MAX, u32::MAX, u32::MAX);
    }
}
