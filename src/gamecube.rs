//! GameCube DXT1 mipmap chain encoding.
//!
//! The GameCube's texture unit reads DXT1 blocks big-endian: the two RGB565
//! reference colors are stored byte-swapped relative to the PC block
//! layout, and the 32-bit index mask is byte-reversed as a whole word. The
//! encoder here builds the full mipmap chain from the imported image,
//! block-compresses every level, and rewrites each 8-byte block into that
//! layout.
//!
//! Levels are laid out largest first with no padding between them. Level
//! `i` measures `max(4, width >> i) × max(4, height >> i)`; 4×4 is the
//! smallest block-compressible tile, so dimensions never shrink below it.

use crate::codec::{BlockCompressor, ResampleFilter, Resampler};
use crate::error::EncodeError;
use image::RgbaImage;

/// Smallest edge a mipmap level can have.
const MIN_LEVEL_EDGE: u32 = 4;

/// DXT1 block footprint in bytes.
const BLOCK_BYTES: usize = 8;

/// Rewrite one 8-byte DXT1 block from the compressor's little-endian
/// layout into the console's big-endian layout.
///
/// Bytes 0..4 hold the two 16-bit reference colors; each pair is swapped
/// in place. Bytes 4..8 hold the 2-bit index mask, byte-reversed as a
/// whole 32-bit word rather than pairwise. The transform is its own
/// inverse.
pub fn swap_block_endianness(block: &mut [u8]) {
    debug_assert_eq!(block.len(), BLOCK_BYTES);
    block.swap(0, 1);
    block.swap(2, 3);
    let mask = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
    block[4..8].copy_from_slice(&mask.to_le_bytes());
}

/// Dimensions of mipmap level `level` for a `width`×`height` base image,
/// floored at 4×4.
pub fn level_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    (
        (width >> level).max(MIN_LEVEL_EDGE),
        (height >> level).max(MIN_LEVEL_EDGE),
    )
}

/// Total encoded size of a chain: `Σ ceil(w_i/4) · ceil(h_i/4) · 8` over
/// levels `0..=mipmaps_count`.
///
/// Hosts use this to size entry slots before encoding.
pub fn chain_size_bytes(width: u32, height: u32, mipmaps_count: u32) -> usize {
    (0..=mipmaps_count)
        .map(|level| {
            let (w, h) = level_dimensions(width, height, level);
            (w.div_ceil(4) * h.div_ceil(4)) as usize * BLOCK_BYTES
        })
        .sum()
}

/// Encode the full mipmap chain of `image` in the GameCube block layout.
///
/// Each level is resampled from the full-resolution image with `filter`,
/// compressed by `compressor`, byte-swapped block by block, and appended
/// to the output, level 0 first.
///
/// # Errors
///
/// Fails on zero width or height, and propagates any resampler or
/// compressor failure unchanged. A compressor emitting a byte count that is
/// not a whole number of blocks is reported as a compression error.
pub fn encode_mipmap_chain(
    image: &RgbaImage,
    mipmaps_count: u32,
    filter: ResampleFilter,
    resampler: &dyn Resampler,
    compressor: &dyn BlockCompressor,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions(width, height));
    }

    let mut chain = Vec::with_capacity(chain_size_bytes(width, height, mipmaps_count));

    for level in 0..=mipmaps_count {
        let (level_w, level_h) = level_dimensions(width, height, level);
        let resized = resampler.resample(image, level_w, level_h, filter)?;
        let mut blocks = compressor.compress(&resized)?;

        if blocks.len() % compressor.block_size() != 0 {
            return Err(EncodeError::Compression(format!(
                "level {}: {} bytes is not a whole number of {}-byte blocks",
                level,
                blocks.len(),
                compressor.block_size()
            )));
        }

        for block in blocks.chunks_exact_mut(BLOCK_BYTES) {
            swap_block_endianness(block);
        }
        chain.extend_from_slice(&blocks);
    }

    Ok(chain)
}
