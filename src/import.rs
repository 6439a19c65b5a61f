//! Import pipeline: entry-type dispatch and host integration.
//!
//! [`ImportPipeline::import`] is the single entry point for a user import
//! action. It resolves the entry type from the slot's record id, encodes
//! the pixels through the matching path, wraps the result with the stream
//! compressor when the type calls for it, and pads the bytes to the slot
//! size. Host-side consequences of the import are returned as values
//! rather than applied in place: a [`MetadataPatch`] describes the header
//! fields the host must update, and preview refresh goes through the
//! best-effort [`PreviewNotifier`] seam.

use crate::codec::{
    Bc1Compressor, BlockCompressor, ImageResampler, PassthroughStream, ResampleFilter, Resampler,
    StreamCompressor,
};
use crate::entry::{EntryType, PaletteKind};
use crate::error::EncodeError;
use crate::gamecube;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Caller-owned snapshot of a directory entry's header fields.
#[derive(Debug, Clone)]
pub struct EntrySlot {
    /// Raw record id; the low seven bits select the entry type.
    pub record_id: u8,
    /// Width recorded in the entry header.
    pub width: u32,
    /// Height recorded in the entry header.
    pub height: u32,
    /// Number of mipmap levels beyond level 0.
    pub mipmaps_count: u32,
    /// Whether the entry is currently flagged as swizzled.
    pub swizzled: bool,
    /// Size of the entry's data slot in the container; shorter encodings
    /// are zero-padded up to this length.
    pub slot_size: usize,
}

/// Linked palette record accompanying an indexed entry.
#[derive(Debug, Clone, Copy)]
pub struct PaletteRef<'a> {
    /// Record id of the palette entry.
    pub entry_id: u8,
    /// Raw palette bytes.
    pub data: &'a [u8],
}

/// One import action: decoded pixels plus the entry they land in.
pub struct ImportRequest<'a> {
    /// Decoded RGBA bytes, 4 bytes per pixel, row-major.
    pub rgba: &'a [u8],
    /// Width of the imported image.
    pub width: u32,
    /// Height of the imported image.
    pub height: u32,
    /// Target entry metadata.
    pub slot: &'a EntrySlot,
    /// Palette record linked to the entry, if any.
    pub palette: Option<PaletteRef<'a>>,
    /// Resampling filter for mipmap generation.
    pub filter: ResampleFilter,
}

/// Header changes the host must apply after a successful import.
///
/// The GameCube path overwrites the entry's dimensions with the imported
/// image's, clears the swizzle flag so the preview draws linear data, and
/// invalidates any cached conversion of the old pixels. Returning the
/// changes as a value keeps host state out of the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPatch {
    /// New entry width.
    pub width: u32,
    /// New entry height.
    pub height: u32,
    /// The swizzle flag must be cleared.
    pub swizzle_cleared: bool,
    /// Any cached conversion buffer for the entry is stale.
    pub cache_invalidated: bool,
}

/// Final import result handed back to the host.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Encoded entry bytes, stream-compressed and padded as required.
    pub encoded_image: Vec<u8>,
    /// Encoded palette bytes; empty on the block-compressed path.
    pub encoded_palette: Vec<u8>,
    /// Record id of the palette entry the encoding refers to, 0 if none.
    pub palette_entry_id: u8,
    /// True when `encoded_palette` carries data the host must store.
    pub palette_imported: bool,
}

/// Host preview hook.
///
/// Failure to refresh the preview must never fail the import; the
/// pipeline logs the reason and carries on.
pub trait PreviewNotifier: Send + Sync {
    /// Tell the host new preview data exists for the entry.
    fn preview_updated(&self, width: u32, height: u32) -> Result<(), String>;
}

/// Stateless import encoder wired to its collaborators.
pub struct ImportPipeline {
    resampler: Arc<dyn Resampler>,
    compressor: Arc<dyn BlockCompressor>,
    stream: Arc<dyn StreamCompressor>,
    notifier: Option<Arc<dyn PreviewNotifier>>,
}

impl ImportPipeline {
    /// Create a pipeline with the default collaborators: `image`-crate
    /// resampling, the built-in BC1 compressor, and no stream compression.
    pub fn new() -> Self {
        Self {
            resampler: Arc::new(ImageResampler),
            compressor: Arc::new(Bc1Compressor),
            stream: Arc::new(PassthroughStream),
            notifier: None,
        }
    }

    /// Replace the resampler collaborator.
    pub fn with_resampler(mut self, resampler: Arc<dyn Resampler>) -> Self {
        self.resampler = resampler;
        self
    }

    /// Replace the block compressor collaborator.
    pub fn with_block_compressor(mut self, compressor: Arc<dyn BlockCompressor>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Replace the stream compressor collaborator (the host's Refpack
    /// codec, typically).
    pub fn with_stream_compressor(mut self, stream: Arc<dyn StreamCompressor>) -> Self {
        self.stream = stream;
        self
    }

    /// Attach a preview notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn PreviewNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Encode one imported image into its entry's stored representation.
    ///
    /// Returns the outcome plus the metadata patch the host must apply,
    /// `None` when the entry's header is untouched by the import.
    ///
    /// # Errors
    ///
    /// Fails on zero dimensions, a pixel buffer that does not match the
    /// declared dimensions, an unknown record id, or any collaborator
    /// failure. No partial output is returned.
    pub fn import(
        &self,
        request: &ImportRequest<'_>,
    ) -> Result<(ImportOutcome, Option<MetadataPatch>), EncodeError> {
        let entry_type = EntryType::from_record_id(request.slot.record_id)?;

        if request.width == 0 || request.height == 0 {
            return Err(EncodeError::InvalidDimensions(request.width, request.height));
        }
        let expected = request.width as usize * request.height as usize * 4;
        if request.rgba.len() != expected {
            return Err(EncodeError::PixelBufferMismatch {
                width: request.width,
                height: request.height,
                expected,
                actual: request.rgba.len(),
            });
        }

        info!(
            entry_type = %entry_type,
            width = request.width,
            height = request.height,
            mipmaps = request.slot.mipmaps_count,
            "importing image entry"
        );

        // from_raw only fails on a length mismatch, checked above.
        let image = RgbaImage::from_raw(request.width, request.height, request.rgba.to_vec())
            .ok_or(EncodeError::InvalidDimensions(request.width, request.height))?;

        let (mut encoded, patch) = match entry_type {
            EntryType::GameCubeDxt1 => {
                // The console path stores linear big-endian blocks; the
                // entry header follows the imported image, and any swizzle
                // flag or cached conversion from the old pixels is void.
                let data = gamecube::encode_mipmap_chain(
                    &image,
                    request.slot.mipmaps_count,
                    request.filter,
                    self.resampler.as_ref(),
                    self.compressor.as_ref(),
                )?;
                let patch = MetadataPatch {
                    width: request.width,
                    height: request.height,
                    swizzle_cleared: request.slot.swizzled,
                    cache_invalidated: true,
                };
                (data, Some(patch))
            }
            _ => (
                self.encode_linear(&image, request.slot.mipmaps_count, request.filter)?,
                None,
            ),
        };

        if entry_type.is_stream_compressed() {
            encoded = self.stream.compress(&encoded)?;
        }

        if encoded.len() < request.slot.slot_size {
            encoded.resize(request.slot.slot_size, 0);
        }

        let palette_entry_id = match request.palette {
            Some(palette) => {
                let kind = PaletteKind::from_record(palette.entry_id, palette.data.len());
                debug!(
                    palette_entry = palette.entry_id,
                    palette_kind = %kind,
                    colors = palette.data.len() / kind.bytes_per_color(),
                    "entry links a palette record"
                );
                palette.entry_id
            }
            None => 0,
        };

        if let Some(notifier) = &self.notifier {
            if let Err(reason) = notifier.preview_updated(request.width, request.height) {
                warn!(%reason, "preview refresh failed; continuing");
            }
        }

        let outcome = ImportOutcome {
            encoded_image: encoded,
            encoded_palette: Vec::new(),
            palette_entry_id,
            palette_imported: false,
        };
        Ok((outcome, patch))
    }

    /// RGBA8888 passthrough used by every non-console entry type: level 0
    /// verbatim, further levels resampled down to `max(1, dim >> i)` and
    /// appended.
    fn encode_linear(
        &self,
        image: &RgbaImage,
        mipmaps_count: u32,
        filter: ResampleFilter,
    ) -> Result<Vec<u8>, EncodeError> {
        let (width, height) = image.dimensions();
        let mut out = Vec::new();

        for level in 0..=mipmaps_count {
            let level_w = (width >> level).max(1);
            let level_h = (height >> level).max(1);
            if level == 0 {
                out.extend_from_slice(image.as_raw());
            } else {
                let resized = self.resampler.resample(image, level_w, level_h, filter)?;
                out.extend_from_slice(resized.as_raw());
            }
        }

        Ok(out)
    }
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(record_id: u8) -> EntrySlot {
        EntrySlot {
            record_id,
            width: 8,
            height: 8,
            mipmaps_count: 0,
            swizzled: false,
            slot_size: 0,
        }
    }

    fn rgba_bytes(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    #[test]
    fn test_import_gamecube_produces_patch() {
        let slot = EntrySlot {
            swizzled: true,
            ..slot(30)
        };
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let (outcome, patch) = ImportPipeline::new().import(&request).unwrap();
        assert_eq!(outcome.encoded_image.len(), 32);
        assert!(outcome.encoded_palette.is_empty());
        assert!(!outcome.palette_imported);

        let patch = patch.expect("GameCube path must patch the header");
        assert_eq!(patch.width, 8);
        assert_eq!(patch.height, 8);
        assert!(patch.swizzle_cleared);
        assert!(patch.cache_invalidated);
    }

    #[test]
    fn test_import_linear_has_no_patch() {
        let slot = slot(5); // ARGB8888
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Triangle,
        };

        let (outcome, patch) = ImportPipeline::new().import(&request).unwrap();
        assert!(patch.is_none());
        assert_eq!(outcome.encoded_image.len(), 8 * 8 * 4);
    }

    #[test]
    fn test_import_linear_mipmaps_append_levels() {
        let slot = EntrySlot {
            mipmaps_count: 2,
            ..slot(5)
        };
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Triangle,
        };

        let (outcome, _) = ImportPipeline::new().import(&request).unwrap();
        // 8×8 + 4×4 + 2×2 pixels, 4 bytes each.
        assert_eq!(outcome.encoded_image.len(), (64 + 16 + 4) * 4);
    }

    #[test]
    fn test_import_pads_to_slot_size() {
        let slot = EntrySlot {
            slot_size: 100,
            ..slot(30)
        };
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let (outcome, _) = ImportPipeline::new().import(&request).unwrap();
        assert_eq!(outcome.encoded_image.len(), 100);
        // The 32 encoded bytes are followed by zero padding.
        assert!(outcome.encoded_image[32..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_import_never_truncates_to_slot_size() {
        let slot = EntrySlot {
            slot_size: 8,
            ..slot(30)
        };
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let (outcome, _) = ImportPipeline::new().import(&request).unwrap();
        assert_eq!(outcome.encoded_image.len(), 32);
    }

    #[test]
    fn test_import_runs_stream_compressor_for_packed_types() {
        struct MarkingStream;
        impl StreamCompressor for MarkingStream {
            fn compress(&self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
                let mut out = vec![0xFB, 0x10];
                out.extend_from_slice(data);
                Ok(out)
            }
        }

        let slot = slot(0x45); // ARGB8888, Refpack-wrapped
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Triangle,
        };

        let pipeline = ImportPipeline::new().with_stream_compressor(Arc::new(MarkingStream));
        let (outcome, _) = pipeline.import(&request).unwrap();
        assert_eq!(&outcome.encoded_image[0..2], &[0xFB, 0x10]);
        assert_eq!(outcome.encoded_image.len(), 2 + 8 * 8 * 4);
    }

    #[test]
    fn test_import_skips_stream_compressor_for_plain_types() {
        struct PanickingStream;
        impl StreamCompressor for PanickingStream {
            fn compress(&self, _data: &[u8]) -> Result<Vec<u8>, EncodeError> {
                panic!("stream compressor must not run for plain types");
            }
        }

        let slot = slot(30);
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let pipeline = ImportPipeline::new().with_stream_compressor(Arc::new(PanickingStream));
        assert!(pipeline.import(&request).is_ok());
    }

    #[test]
    fn test_import_unknown_record_id_fails() {
        let slot = slot(99);
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let result = ImportPipeline::new().import(&request);
        assert!(matches!(result, Err(EncodeError::UnsupportedEntryType(99))));
    }

    #[test]
    fn test_import_rejects_short_pixel_buffer() {
        let slot = slot(30);
        let rgba = vec![0u8; 10];
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let result = ImportPipeline::new().import(&request);
        assert!(matches!(
            result,
            Err(EncodeError::PixelBufferMismatch { expected: 256, actual: 10, .. })
        ));
    }

    #[test]
    fn test_import_carries_palette_entry_id() {
        let slot = slot(2); // indexed-8
        let rgba = rgba_bytes(8, 8);
        let palette_data = vec![0u8; 1024];
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: Some(PaletteRef {
                entry_id: 33,
                data: &palette_data,
            }),
            filter: ResampleFilter::Triangle,
        };

        let (outcome, _) = ImportPipeline::new().import(&request).unwrap();
        assert_eq!(outcome.palette_entry_id, 33);
        assert!(!outcome.palette_imported);
    }

    #[test]
    fn test_notifier_failure_does_not_fail_import() {
        struct FailingNotifier;
        impl PreviewNotifier for FailingNotifier {
            fn preview_updated(&self, _width: u32, _height: u32) -> Result<(), String> {
                Err("tab is closed".into())
            }
        }

        let slot = slot(30);
        let rgba = rgba_bytes(8, 8);
        let request = ImportRequest {
            rgba: &rgba,
            width: 8,
            height: 8,
            slot: &slot,
            palette: None,
            filter: ResampleFilter::Nearest,
        };

        let pipeline = ImportPipeline::new().with_notifier(Arc::new(FailingNotifier));
        assert!(pipeline.import(&request).is_ok());
    }
}
