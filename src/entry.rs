//! Entry types and palette formats for game-asset image slots.
//!
//! Every image entry carries a one-byte record id. The low seven bits name
//! the storage encoding; the high bit is reserved by the container format
//! and is masked off before dispatch. Codes with the `0x40` bit are
//! Refpack-wrapped variants of the corresponding base encoding.

use crate::error::EncodeError;
use std::fmt;

/// Bit of the entry-type code marking a Refpack-wrapped encoding.
const STREAM_COMPRESSED_BIT: u8 = 0x40;

/// Storage encoding of an image entry, dispatched from its record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    /// 4-bit indices into a linked palette.
    Indexed4 = 1,
    /// 8-bit indices into a linked palette.
    Indexed8 = 2,
    /// 16-bit ARGB1555 pixels.
    Argb1555 = 3,
    /// 24-bit RGB pixels.
    Rgb888 = 4,
    /// 32-bit ARGB pixels.
    Argb8888 = 5,
    /// 16-bit RGB565 pixels, no alpha.
    Rgb565 = 8,
    /// 16-bit ARGB4444 pixels.
    Argb4444 = 9,
    /// 8-bit grayscale.
    Gray8 = 11,
    /// 8-bit grayscale with 8-bit alpha.
    GrayAlpha8 = 12,
    /// 16-bit indices into a linked palette.
    Indexed16 = 13,
    /// DXT1 blocks in the GameCube's big-endian layout, mipmap chain
    /// appended, never swizzled.
    GameCubeDxt1 = 30,
    /// Refpack-wrapped [`EntryType::Indexed4`].
    Indexed4Packed = 0x41,
    /// Refpack-wrapped [`EntryType::Indexed8`].
    Indexed8Packed = 0x42,
    /// Refpack-wrapped [`EntryType::Argb1555`].
    Argb1555Packed = 0x43,
    /// Refpack-wrapped [`EntryType::Rgb888`].
    Rgb888Packed = 0x44,
    /// Refpack-wrapped [`EntryType::Argb8888`].
    Argb8888Packed = 0x45,
}

impl EntryType {
    /// Resolve an entry type from a record id.
    ///
    /// The container's high bit is masked off before matching.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnsupportedEntryType`] when the masked code
    /// names no known encoding.
    pub fn from_record_id(record_id: u8) -> Result<Self, EncodeError> {
        let code = record_id & 0x7F;
        match code {
            1 => Ok(Self::Indexed4),
            2 => Ok(Self::Indexed8),
            3 => Ok(Self::Argb1555),
            4 => Ok(Self::Rgb888),
            5 => Ok(Self::Argb8888),
            8 => Ok(Self::Rgb565),
            9 => Ok(Self::Argb4444),
            11 => Ok(Self::Gray8),
            12 => Ok(Self::GrayAlpha8),
            13 => Ok(Self::Indexed16),
            30 => Ok(Self::GameCubeDxt1),
            0x41 => Ok(Self::Indexed4Packed),
            0x42 => Ok(Self::Indexed8Packed),
            0x43 => Ok(Self::Argb1555Packed),
            0x44 => Ok(Self::Rgb888Packed),
            0x45 => Ok(Self::Argb8888Packed),
            _ => Err(EncodeError::UnsupportedEntryType(code)),
        }
    }

    /// Numeric entry-type code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Storage bits per pixel for this encoding.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Indexed4 | Self::Indexed4Packed | Self::GameCubeDxt1 => 4,
            Self::Indexed8 | Self::Indexed8Packed | Self::Gray8 => 8,
            Self::Argb1555
            | Self::Argb1555Packed
            | Self::Rgb565
            | Self::Argb4444
            | Self::GrayAlpha8
            | Self::Indexed16 => 16,
            Self::Rgb888 | Self::Rgb888Packed => 24,
            Self::Argb8888 | Self::Argb8888Packed => 32,
        }
    }

    /// True for palette-indexed encodings, which need a linked palette
    /// record to be rendered.
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::Indexed4
                | Self::Indexed8
                | Self::Indexed16
                | Self::Indexed4Packed
                | Self::Indexed8Packed
        )
    }

    /// True when the stored bytes are wrapped with Refpack stream
    /// compression after pixel encoding.
    pub fn is_stream_compressed(self) -> bool {
        self.code() & STREAM_COMPRESSED_BIT != 0
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Indexed4 => "indexed-4",
            Self::Indexed8 => "indexed-8",
            Self::Argb1555 => "argb1555",
            Self::Rgb888 => "rgb888",
            Self::Argb8888 => "argb8888",
            Self::Rgb565 => "rgb565",
            Self::Argb4444 => "argb4444",
            Self::Gray8 => "gray-8",
            Self::GrayAlpha8 => "gray-alpha-8",
            Self::Indexed16 => "indexed-16",
            Self::GameCubeDxt1 => "gamecube-dxt1",
            Self::Indexed4Packed => "indexed-4/refpack",
            Self::Indexed8Packed => "indexed-8/refpack",
            Self::Argb1555Packed => "argb1555/refpack",
            Self::Rgb888Packed => "rgb888/refpack",
            Self::Argb8888Packed => "argb8888/refpack",
        };
        write!(f, "{}", name)
    }
}

/// Storage format of a linked palette record.
///
/// Palette records carry no format field of their own; the format is
/// derived from the palette record id, falling back to the byte length for
/// ids outside the known set (assuming a 256-color table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    /// 32-bit RGBA colors.
    Rgba8888,
    /// 24-bit RGB colors.
    Rgb888,
    /// 16-bit ARGB1555 colors.
    Argb1555,
    /// 16-bit RGB565 colors.
    Rgb565,
}

impl PaletteKind {
    /// Derive the palette format from its record id and byte length.
    pub fn from_record(entry_id: u8, byte_len: usize) -> Self {
        match entry_id {
            33 | 36 => Self::Rgba8888,
            34 => Self::Rgb888,
            41 => Self::Argb1555,
            45 => Self::Rgb565,
            _ => match byte_len / 256 {
                4 => Self::Rgba8888,
                3 => Self::Rgb888,
                _ => Self::Argb1555,
            },
        }
    }

    /// Bytes occupied by one palette color.
    pub fn bytes_per_color(self) -> usize {
        match self {
            Self::Rgba8888 => 4,
            Self::Rgb888 => 3,
            Self::Argb1555 | Self::Rgb565 => 2,
        }
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgba8888 => "rgba8888",
            Self::Rgb888 => "rgb888",
            Self::Argb1555 => "argb1555",
            Self::Rgb565 => "rgb565",
        };
        write!(f, "{}", name)
    }
}
