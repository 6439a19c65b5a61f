//! eagfx - game-asset image import encoding.
//!
//! This library turns decoded RGBA pixel data from a user import action into
//! the stored byte representation of a game-asset image entry. The entry's
//! header metadata (record id, dimensions, mipmap count, swizzle flag, slot
//! size) selects one of sixteen storage encodings.
//!
//! The fully self-contained path is the GameCube DXT1 entry type: the import
//! builds a resampled mipmap chain, block-compresses every level, and
//! rewrites each 8-byte block into the big-endian layout the console's
//! texture unit expects. Resampling, block compression, stream compression
//! and preview refresh are all reached through narrow collaborator traits so
//! hosts can substitute their own codecs.
//!
//! # Example
//!
//! ```
//! use eagfx::codec::ResampleFilter;
//! use eagfx::import::{EntrySlot, ImportPipeline, ImportRequest};
//!
//! let slot = EntrySlot {
//!     record_id: 30, // GameCube DXT1
//!     width: 8,
//!     height: 8,
//!     mipmaps_count: 1,
//!     swizzled: false,
//!     slot_size: 0,
//! };
//! let rgba = vec![0u8; 8 * 8 * 4];
//! let request = ImportRequest {
//!     rgba: &rgba,
//!     width: 8,
//!     height: 8,
//!     slot: &slot,
//!     palette: None,
//!     filter: ResampleFilter::Triangle,
//! };
//!
//! let pipeline = ImportPipeline::new();
//! let (outcome, patch) = pipeline.import(&request).unwrap();
//! assert!(!outcome.encoded_image.is_empty());
//! assert!(patch.is_some());
//! ```

pub mod codec;
pub mod entry;
pub mod error;
pub mod gamecube;
pub mod import;
pub mod logging;

pub use error::EncodeError;

/// Version of the eagfx library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
