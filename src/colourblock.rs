//! The BC1-style colour block shared by every supported format: two RGB565
//! endpoint colours followed by a 32-bit field of 2-bit palette indices.

use byteorder::{ByteOrder, LE};

/// Quantizes an RGB888 colour to RGB565 by truncating the low bits of each
/// channel. No rounding or dithering takes place.
pub fn pack_565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Expands an RGB565 colour back to RGB888. The low bits dropped by
/// [`pack_565`] are zero-filled, not reconstructed.
pub fn unpack_565(colour: u16) -> [u8; 3] {
    let r = ((colour >> 11) & 0x1F) as u8;
    let g = ((colour >> 5) & 0x3F) as u8;
    let b = (colour & 0x1F) as u8;
    [r << 3, g << 2, b << 3]
}

/// Brightness proxy used for endpoint selection: cheap and green-heavy, not
/// perceptually weighted.
fn luminance(pixel: &[u8; 4]) -> u32 {
    2 * u32::from(pixel[0]) + 4 * u32::from(pixel[1]) + u32::from(pixel[2])
}

/// Two-thirds/one-third blend of two expanded endpoints.
fn blend(x: [u8; 3], y: [u8; 3]) -> [u8; 3] {
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = ((2 * u32::from(x[c]) + u32::from(y[c])) / 3) as u8;
    }
    out
}

/// Midpoint of two expanded endpoints, used by the three-colour mode.
fn average(x: [u8; 3], y: [u8; 3]) -> [u8; 3] {
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = ((u32::from(x[c]) + u32::from(y[c])) / 2) as u8;
    }
    out
}

fn opaque(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], 0xFF]
}

fn distance_sq(pixel: &[u8; 4], entry: [u8; 3]) -> u32 {
    let mut dist = 0u32;
    for c in 0..3 {
        let d = i32::from(pixel[c]) - i32::from(entry[c]);
        dist += (d * d) as u32;
    }
    dist
}

/// Compresses the colour channels of a 4x4 block into 8 bytes.
///
/// The endpoints are the pixels with the lowest and highest luminance, the
/// earliest such pixel winning a tie. Every pixel then stores the index of
/// the palette entry at the smallest squared RGB distance. Alpha is ignored.
pub fn compress(rgba: &[[u8; 4]; 16], block: &mut [u8]) {
    // find the darkest and brightest pixel
    let mut min_lum = luminance(&rgba[0]);
    let mut max_lum = min_lum;
    let mut darkest = 0;
    let mut brightest = 0;
    for (i, pixel) in rgba.iter().enumerate().skip(1) {
        let lum = luminance(pixel);
        if lum < min_lum {
            min_lum = lum;
            darkest = i;
        }
        if lum > max_lum {
            max_lum = lum;
            brightest = i;
        }
    }

    let colour0 = pack_565(rgba[darkest][0], rgba[darkest][1], rgba[darkest][2]);
    let colour1 = pack_565(rgba[brightest][0], rgba[brightest][1], rgba[brightest][2]);

    // index selection runs against the quantized endpoints, never the
    // source pixels
    let e0 = unpack_565(colour0);
    let e1 = unpack_565(colour1);
    let palette = [e0, e1, blend(e0, e1), blend(e1, e0)];

    let mut indices = 0u32;
    for (i, pixel) in rgba.iter().enumerate() {
        let mut best = 0u32;
        let mut best_dist = u32::MAX;
        for (j, &entry) in palette.iter().enumerate() {
            let dist = distance_sq(pixel, entry);
            if dist < best_dist {
                best_dist = dist;
                best = j as u32;
            }
        }
        indices |= best << (2 * i);
    }

    LE::write_u16(&mut block[0..2], colour0);
    LE::write_u16(&mut block[2..4], colour1);
    LE::write_u32(&mut block[4..8], indices);
}

/// Decompresses an 8-byte colour block into 16 RGBA pixels.
///
/// `colour0 > colour1` (raw 16-bit compare) selects the four-colour opaque
/// palette; anything else decodes through the three-colour palette whose
/// last entry is transparent black. BC3 reuses this path unchanged and
/// overwrites alpha afterwards.
pub fn decompress(block: &[u8]) -> [[u8; 4]; 16] {
    let colour0 = LE::read_u16(&block[0..2]);
    let colour1 = LE::read_u16(&block[2..4]);
    let indices = LE::read_u32(&block[4..8]);

    let e0 = unpack_565(colour0);
    let e1 = unpack_565(colour1);

    let palette: [[u8; 4]; 4] = if colour0 > colour1 {
        [
            opaque(e0),
            opaque(e1),
            opaque(blend(e0, e1)),
            opaque(blend(e1, e0)),
        ]
    } else {
        [opaque(e0), opaque(e1), opaque(average(e0, e1)), [0, 0, 0, 0]]
    };

    let mut rgba = [[0u8; 4]; 16];
    for (i, pixel) in rgba.iter_mut().enumerate() {
        *pixel = palette[((indices >> (2 * i)) & 0x3) as usize];
    }
    rgba
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
