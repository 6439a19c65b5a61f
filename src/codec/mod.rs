//! Collaborator seams for resampling and compression.
//!
//! The import pipeline never encodes pixels or compresses streams itself;
//! it reaches every codec through one of the narrow traits defined here.
//! Default implementations are provided for resampling (the `image` crate)
//! and BC1 block compression. Stream compression (Refpack) is supplied by
//! the host; [`PassthroughStream`] exists for hosts that store entries
//! uncompressed and for tests.

mod bc1;
mod resample;

pub use bc1::Bc1Compressor;
pub use resample::{ImageResampler, ResampleFilter};

use crate::error::EncodeError;
use image::RgbaImage;

/// Resizes an RGBA image to a target size with a named filter.
///
/// Implementations must be thread-safe (`Send + Sync`); the pipeline is
/// stateless and may be driven from several threads at once.
pub trait Resampler: Send + Sync {
    /// Resample `image` to `width`×`height`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target dimensions are unsupported or the
    /// underlying filter fails. The pipeline propagates it unchanged.
    fn resample(
        &self,
        image: &RgbaImage,
        width: u32,
        height: u32,
        filter: ResampleFilter,
    ) -> Result<RgbaImage, EncodeError>;
}

/// Compresses an RGBA image into fixed-size blocks, one block per 4×4
/// pixel tile, tiles in row-major order. Partial edge tiles are padded by
/// the implementation.
pub trait BlockCompressor: Send + Sync {
    /// Compress the whole image. The output length is a multiple of
    /// [`BlockCompressor::block_size`].
    fn compress(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError>;

    /// Size in bytes of one compressed block.
    fn block_size(&self) -> usize {
        8
    }
}

/// Wraps an encoded byte stream with a stream compressor (Refpack in the
/// original container format). Applied only to entry types flagged as
/// stream-compressed.
pub trait StreamCompressor: Send + Sync {
    /// Compress `data` into the container's stream format.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, EncodeError>;
}

/// Stream stage that stores bytes unmodified.
pub struct PassthroughStream;

impl StreamCompressor for PassthroughStream {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
        Ok(data.to_vec())
    }
}
