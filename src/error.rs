//! Error types for import encoding.

use thiserror::Error;

/// Errors that can occur while encoding an imported image.
///
/// All errors abort the current import; nothing is retried and no partial
/// output is returned. Collaborator failures are surfaced to the caller
/// unchanged, wrapped only to name the failing stage.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Image width or height is zero.
    #[error("Invalid dimensions: {0}×{1}")]
    InvalidDimensions(u32, u32),

    /// Pixel buffer length does not match the declared dimensions.
    #[error("Pixel buffer is {actual} bytes, expected {expected} for {width}×{height} RGBA")]
    PixelBufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Record id does not map to a known entry type.
    #[error("Unsupported entry type: {0}")]
    UnsupportedEntryType(u8),

    /// The resampler collaborator failed.
    #[error("Resampling failed: {0}")]
    Resample(String),

    /// The block compressor collaborator failed.
    #[error("Block compression failed: {0}")]
    Compression(String),

    /// The stream compressor collaborator failed.
    #[error("Stream compression failed: {0}")]
    StreamCompression(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = EncodeError::InvalidDimensions(0, 128);
        assert_eq!(err.to_string(), "Invalid dimensions: 0×128");
    }

    #[test]
    fn test_pixel_buffer_mismatch_display() {
        let err = EncodeError::PixelBufferMismatch {
            width: 4,
            height: 4,
            expected: 64,
            actual: 48,
        };
        assert_eq!(
            err.to_string(),
            "Pixel buffer is 48 bytes, expected 64 for 4×4 RGBA"
        );
    }

    #[test]
    fn test_unsupported_entry_type_display() {
        let err = EncodeError::UnsupportedEntryType(99);
        assert_eq!(err.to_string(), "Unsupported entry type: 99");
    }

    #[test]
    fn test_collaborator_errors_name_the_stage() {
        assert!(EncodeError::Resample("bad filter".into())
            .to_string()
            .starts_with("Resampling failed"));
        assert!(EncodeError::Compression("odd size".into())
            .to_string()
            .starts_with("Block compression failed"));
        assert!(EncodeError::StreamCompression("overflow".into())
            .to_string()
            .starts_with("Stream compression failed"));
    }
}
