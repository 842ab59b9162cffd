use crate::{alpha, colourblock, private, Decoder, Encoder};

/// The BC3 format, also known as DXT5.
///
/// Pairs the BC1 colour block with an interpolated alpha block, giving every
/// pixel an independent alpha at 16 bytes per block.
pub struct BC3 {}

impl private::Format for BC3 {
    fn block_size() -> usize {
        16
    }
}

impl private::Decoder for BC3 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        use private::Format;
        assert_eq!(block.len(), Self::block_size());
        // decompress colour block
        let mut rgba = colourblock::decompress(&block[8..16]);
        // decompress alpha block
        alpha::decompress(&mut rgba, &block[..8]);
        rgba
    }
}

impl Decoder for BC3 {}

impl private::Encoder for BC3 {
    fn compress_block(rgba: [[u8; 4]; 16], output: &mut [u8]) {
        // compress colour block
        colourblock::compress(&rgba, &mut output[8..16]);
        // compress alpha block
        alpha::compress(&rgba, &mut output[..8]);
    }
}

impl Encoder for BC3 {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn test_storage_requirements() {
        assert_eq!(BC3::compressed_size(16, 32), 512);
        assert_eq!(BC3::compressed_size(15, 32), 512);
        assert_eq!(BC3::compressed_size(6, 5), 64);
        assert_eq!(BC3::compressed_size(10, 5), 96);
    }

    // Top half transparent dark red, bottom half opaque bright green; the
    // colours and the alphas all survive quantization.
    static ENCODED_BLOCK_TWO_TONE: [u8; 16] = [
        0x00, 0xFF, 0x00, 0x00, 0x00, 0x49, 0x92, 0x24, // alpha block
        0x00, 0xF8, 0xE0, 0x07, 0x00, 0x00, 0x55, 0x55, // colour block
    ];

    fn two_tone_rgba() -> [u8; 4 * 4 * 4] {
        let mut rgba = [0u8; 4 * 4 * 4];
        for (i, pixel) in rgba.chunks_mut(4).enumerate() {
            pixel.copy_from_slice(if i < 8 {
                &[248, 0, 0, 0]
            } else {
                &[0, 252, 0, 255]
            });
        }
        rgba
    }

    #[test]
    fn test_bc3_compression_two_tone() {
        let mut output_actual = [0u8; 16];
        BC3::compress(&two_tone_rgba(), 4, 4, &mut output_actual).unwrap();
        assert_eq!(output_actual, ENCODED_BLOCK_TWO_TONE);
    }

    #[test]
    fn test_bc3_decompression_two_tone() {
        let mut output_actual = [0u8; 4 * 4 * 4];
        BC3::decompress(&ENCODED_BLOCK_TWO_TONE, 4, 4, &mut output_actual).unwrap();
        assert_eq!(output_actual, two_tone_rgba());
    }

    #[test]
    fn test_bc3_colour_modes_match_bc1() {
        // the colour half follows the same mode split as BC1: equal
        // endpoints put index 3 at RGB (0,0,0), while the alpha block still
        // has the last word on the alpha channel
        let encoded: [u8; 16] = [
            0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // solid alpha 255
            0x1F, 0x00, 0x1F, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, // blue, all index 3
        ];
        let mut output_actual = [0u8; 4 * 4 * 4];
        BC3::decompress(&encoded, 4, 4, &mut output_actual).unwrap();
        for pixel in output_actual.chunks(4) {
            assert_eq!(pixel, [0, 0, 0, 255]);
        }
    }
}
