//! The interpolated alpha block used by BC3: two endpoint alphas followed by
//! a 48-bit field of 3-bit palette indices.

use byteorder::{ByteOrder, LE};

/// Rebuilds the 8-entry alpha palette described by a block's endpoints.
///
/// `alpha0 > alpha1` selects eight interpolated levels; anything else selects
/// six interpolated levels plus constant 0 and 255. An encoder driven by
/// min/max endpoints only ever produces the second form, but foreign streams
/// may carry the first.
fn build_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = u32::from(alpha0);
    let a1 = u32::from(alpha1);

    let mut palette = [0u8; 8];
    palette[0] = alpha0;
    palette[1] = alpha1;
    if alpha0 > alpha1 {
        for i in 1..7u32 {
            palette[i as usize + 1] = (((7 - i) * a0 + i * a1) / 7) as u8;
        }
    } else {
        for i in 1..5u32 {
            palette[i as usize + 1] = (((5 - i) * a0 + i * a1) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 255;
    }
    palette
}

/// Compresses the alpha channel of a 4x4 block into 8 bytes.
///
/// The endpoints are the minimum and maximum alpha in the block; every pixel
/// then stores the index of the palette entry at the smallest absolute
/// difference, the lowest index winning ties.
pub fn compress(rgba: &[[u8; 4]; 16], block: &mut [u8]) {
    let mut alpha0 = rgba[0][3];
    let mut alpha1 = rgba[0][3];
    for pixel in &rgba[1..] {
        alpha0 = alpha0.min(pixel[3]);
        alpha1 = alpha1.max(pixel[3]);
    }

    block[0] = alpha0;
    block[1] = alpha1;

    let palette = build_palette(alpha0, alpha1);
    let mut indices = 0u64;
    for (i, pixel) in rgba.iter().enumerate() {
        let mut best = 0u64;
        let mut best_diff = u32::MAX;
        for (j, &entry) in palette.iter().enumerate() {
            let diff = u32::from(pixel[3].abs_diff(entry));
            if diff < best_diff {
                best_diff = diff;
                best = j as u64;
            }
        }
        indices |= best << (3 * i);
    }

    LE::write_u48(&mut block[2..8], indices);
}

/// Decompresses an 8-byte alpha block, overwriting the alpha channel of all
/// 16 pixels. The colour channels are left as decoded.
pub fn decompress(rgba: &mut [[u8; 4]; 16], block: &[u8]) {
    let palette = build_palette(block[0], block[1]);
    let indices = LE::read_u48(&block[2..8]);
    for (i, pixel) in rgba.iter_mut().enumerate() {
        pixel[3] = palette[((indices >> (3 * i)) & 0x7) as usize];
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
