//! A pure Rust BC1/BC3 (DXT1/DXT5) texture block compressor and decompressor.
//!
//! Both formats store an image as independent 4x4 pixel blocks:
//! * BC1: two RGB565 endpoint colours plus 2-bit palette indices, 8 bytes per block
//! * BC3: an interpolated alpha block with 3-bit indices followed by a BC1-style
//!   colour block, 16 bytes per block
//!
//! Compression picks block endpoints with a cheap luminance heuristic
//! (`2R + 4G + B`) instead of an optimal search, trading quality for speed and
//! reproducible output bytes. Images whose dimensions are not multiples of four
//! are padded with transparent black pixels; the padding takes part in endpoint
//! selection but is never read from the source image or written back when
//! decompressing.
//!
//! Compressed streams carry no header: the caller is responsible for moving
//! width and height alongside the block bytes.

#![no_std]

mod alpha;
mod bc1;
mod bc3;
mod colourblock;

use thiserror::Error;

// re-export the BC formats
pub use bc1::BC1;
pub use bc3::BC3;

/// Errors reported when a buffer precondition does not hold.
///
/// The codec itself is total: once the buffers match the requested dimensions
/// no per-pixel operation can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `width * height * 4` does not fit in a `usize`.
    #[error("image dimensions {width}x{height} overflow the addressable size")]
    InvalidDimensions { width: usize, height: usize },

    /// The input buffer is shorter than the given dimensions require.
    #[error("input buffer holds {actual} bytes but {expected} are required")]
    InvalidBufferSize { expected: usize, actual: usize },

    /// The output buffer is shorter than the given dimensions require.
    #[error("output buffer holds {actual} bytes but {needed} are required")]
    OutputBufferTooSmall { needed: usize, actual: usize },
}

/// Returns number of blocks needed for an image of given dimension
fn num_blocks(size: usize) -> usize {
    size.div_ceil(4)
}

/// Returns the byte length of a `width` x `height` RGBA8 image, or an error
/// when that length does not fit in a `usize`.
fn raw_image_size(width: usize, height: usize) -> Result<usize, Error> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(Error::InvalidDimensions { width, height })
}

/// Returns the byte length of the compressed stream for an image of the given
/// dimensions, or an error when that length does not fit in a `usize`.
fn compressed_image_size(width: usize, height: usize, block_size: usize) -> Result<usize, Error> {
    num_blocks(width)
        .checked_mul(num_blocks(height))
        .and_then(|blocks| blocks.checked_mul(block_size))
        .ok_or(Error::InvalidDimensions { width, height })
}

/// This module is used for sealing traits.
/// See <https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed>
mod private {
    pub trait Format {
        /// Returns how many bytes a 4x4 block of pixels will compress into.
        fn block_size() -> usize;
    }

    pub trait Decoder: Format {
        /// Decompresses a 4x4 block of pixels
        ///
        /// * `block` - The compressed block of pixels
        fn decompress_block(block: &[u8]) -> [[u8; 4]; 16];
    }

    pub trait Encoder: Format {
        /// Compresses a 4x4 block of pixels. Pixels synthesized to pad the
        /// image to a multiple of the block size must be transparent black.
        ///
        /// * `rgba`   - The uncompressed block of pixels
        /// * `output` - Storage for the compressed block
        fn compress_block(rgba: [[u8; 4]; 16], output: &mut [u8]);
    }
}

/// Abstraction over any decoder for any format.
/// Note that this trait is sealed, i.e. it can not be implemented outside of this crate.
pub trait Decoder: private::Decoder {
    /// Decompresses an image in memory
    ///
    /// The first `width * height * 4` bytes of `output` are zeroed before any
    /// block is decoded, then overwritten pixel by pixel; bytes past that
    /// prefix are left untouched. Fails with [`Error::InvalidBufferSize`] when
    /// `data` holds fewer blocks than the dimensions require and with
    /// [`Error::OutputBufferTooSmall`] when `output` cannot hold the image.
    ///
    /// * `data`   - The compressed image data
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `output` - Space to store the decompressed image
    fn decompress(
        data: &[u8],
        width: usize,
        height: usize,
        output: &mut [u8],
    ) -> Result<(), Error> {
        let raw_size = raw_image_size(width, height)?;
        let block_size = Self::block_size();
        let blocks_wide = num_blocks(width);

        let compressed_size = compressed_image_size(width, height, block_size)?;
        if data.len() < compressed_size {
            return Err(Error::InvalidBufferSize {
                expected: compressed_size,
                actual: data.len(),
            });
        }
        if output.len() < raw_size {
            return Err(Error::OutputBufferTooSmall {
                needed: raw_size,
                actual: output.len(),
            });
        }

        // Confine all reads and writes to the contract region.
        let data = &data[..compressed_size];
        let output = &mut output[..raw_size];

        // Pixels the block loop never reaches stay transparent black.
        output.fill(0);

        // loop over blocks
        for (bidx, block) in data.chunks(block_size).enumerate() {
            let rgba = Self::decompress_block(block);

            // write the decompressed pixels to the correct image location
            let x = bidx % blocks_wide;
            let y = bidx / blocks_wide;
            for py in 0..4 {
                for px in 0..4 {
                    // get target location
                    let sx = 4 * x + px;
                    let sy = 4 * y + py;

                    // skip padding pixels past the image edge
                    if sx < width && sy < height {
                        let index = 4 * (width * sy + sx);
                        output[index..index + 4].copy_from_slice(&rgba[px + py * 4]);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Abstraction over any encoder for any format.
/// Note that this trait is sealed, i.e. it can not be implemented outside of this crate.
pub trait Encoder: private::Encoder {
    /// Computes the amount of space in bytes needed for an image of given size,
    /// accounting for padding to a multiple of 4x4 pixels
    ///
    /// * `width`  - Width of the uncompressed image
    /// * `height` - Height of the uncompressed image
    fn compressed_size(width: usize, height: usize) -> usize {
        // Number of blocks required for image of given dimensions
        let blocks = num_blocks(width) * num_blocks(height);
        blocks * Self::block_size()
    }

    /// Compresses an image in memory
    ///
    /// Exactly `compressed_size(width, height)` bytes of `output` are written;
    /// bytes past that prefix are left untouched. Fails with
    /// [`Error::InvalidBufferSize`] when `rgba` is shorter than
    /// `width * height * 4` and with [`Error::OutputBufferTooSmall`] when
    /// `output` cannot hold every block.
    ///
    /// * `rgba`   - The uncompressed pixel data
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `output` - Output buffer for the compressed image
    fn compress(rgba: &[u8], width: usize, height: usize, output: &mut [u8]) -> Result<(), Error> {
        let raw_size = raw_image_size(width, height)?;
        if rgba.len() < raw_size {
            return Err(Error::InvalidBufferSize {
                expected: raw_size,
                actual: rgba.len(),
            });
        }

        let block_size = Self::block_size();
        let needed = compressed_image_size(width, height, block_size)?;
        if output.len() < needed {
            return Err(Error::OutputBufferTooSmall {
                needed,
                actual: output.len(),
            });
        }

        if width == 0 || height == 0 {
            return Ok(());
        }

        let blocks_wide = num_blocks(width);

        let output_rows = output[..needed].chunks_mut(blocks_wide * block_size);
        output_rows.enumerate().for_each(|(y, output_row)| {
            let output_blocks = output_row.chunks_mut(block_size);

            output_blocks.enumerate().for_each(|(x, output_block)| {
                // build the 4x4 block of pixels, padding past the image edge
                // with transparent black
                let mut source_rgba = [[0u8; 4]; 16];
                for py in 0..4 {
                    for px in 0..4 {
                        let index = 4 * py + px;

                        // get position in source image
                        let sx = 4 * x + px;
                        let sy = 4 * y + py;

                        if sx < width && sy < height {
                            // copy pixel value
                            let src_index = 4 * (width * sy + sx);
                            source_rgba[index].copy_from_slice(&rgba[src_index..src_index + 4]);
                        }
                    }
                }

                Self::compress_block(source_rgba, output_block);
            });
        });

        Ok(())
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_blocks() {
        assert_eq!(num_blocks(0), 0);
        assert_eq!(num_blocks(1), 1);
        assert_eq!(num_blocks(2), 1);
        assert_eq!(num_blocks(3), 1);
        assert_eq!(num_blocks(4), 1);
        assert_eq!(num_blocks(5), 2);
        assert_eq!(num_blocks(6), 2);
    }

    #[test]
    fn test_raw_image_size() {
        assert_eq!(raw_image_size(6, 5), Ok(120));
        assert_eq!(raw_image_size(0, 17), Ok(0));
        assert_eq!(
            raw_image_size(usize::MAX, 2),
            Err(Error::InvalidDimensions {
                width: usize::MAX,
                height: 2,
            })
        );
    }

    #[test]
    fn test_undersized_input_is_rejected() {
        let mut output = [0u8; 16 * 16 * 4];
        let compressed = [0u8; 8];

        // 16x16 BC1 needs 16 blocks, 128 bytes
        assert_eq!(
            BC1::decompress(&compressed, 16, 16, &mut output),
            Err(Error::InvalidBufferSize {
                expected: 128,
                actual: 8,
            })
        );

        let rgba = [0u8; 4 * 4 * 4];
        let mut compressed = [0u8; 16];
        assert_eq!(
            BC3::compress(&rgba, 8, 4, &mut compressed),
            Err(Error::InvalidBufferSize {
                expected: 128,
                actual: 64,
            })
        );
    }

    #[test]
    fn test_undersized_output_is_rejected() {
        let rgba = [0u8; 4 * 4 * 4];
        let mut compressed = [0u8; 7];
        assert_eq!(
            BC1::compress(&rgba, 4, 4, &mut compressed),
            Err(Error::OutputBufferTooSmall {
                needed: 8,
                actual: 7,
            })
        );

        let block = [0u8; 16];
        let mut rgba = [0u8; 63];
        assert_eq!(
            BC3::decompress(&block, 4, 4, &mut rgba),
            Err(Error::OutputBufferTooSmall {
                needed: 64,
                actual: 63,
            })
        );
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let mut output = [0u8; 64];
        assert_eq!(
            BC1::decompress(&[], usize::MAX, 2, &mut output),
            Err(Error::InvalidDimensions {
                width: usize::MAX,
                height: 2,
            })
        );
    }

    #[test]
    fn test_empty_image_is_a_no_op() {
        let mut output = [0xAAu8; 4];
        assert_eq!(BC1::compress(&[], 0, 7, &mut output), Ok(()));
        assert_eq!(BC3::decompress(&[], 9, 0, &mut output), Ok(()));
        // nothing was written
        assert_eq!(output, [0xAAu8; 4]);
    }
}
