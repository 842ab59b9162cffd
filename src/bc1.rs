use crate::{colourblock, private, Decoder, Encoder};

/// The BC1 format, also known as DXT1.
///
/// Stores colour only: compression ignores the alpha channel and
/// decompression reports every pixel as opaque, except for index 3 of a
/// three-colour block which decodes to transparent black.
pub struct BC1 {}

impl private::Format for BC1 {
    fn block_size() -> usize {
        8
    }
}

impl private::Decoder for BC1 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        use private::Format;
        assert_eq!(block.len(), Self::block_size());
        // decompress colour block
        colourblock::decompress(block)
    }
}

impl Decoder for BC1 {}

impl private::Encoder for BC1 {
    fn compress_block(rgba: [[u8; 4]; 16], output: &mut [u8]) {
        // compress colour block
        colourblock::compress(&rgba, output)
    }
}

impl Encoder for BC1 {}
