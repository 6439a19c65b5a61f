//! BC1 (DXT1) block compression.
//!
//! Each 4×4 tile of RGBA pixels becomes 8 bytes: two RGB565 reference
//! colors followed by a 32-bit field of 2-bit palette indices, all
//! little-endian. The two reference colors span a palette of four:
//!
//! - `00`: color0
//! - `01`: color1
//! - `10`: 2/3 color0 + 1/3 color1
//! - `11`: 1/3 color0 + 2/3 color1
//!
//! Endpoints are chosen with the bounding-box method: the per-channel
//! minimum and maximum over the tile. Keeping `color0 > color1` selects the
//! opaque 4-color mode.

use crate::codec::BlockCompressor;
use crate::error::EncodeError;
use image::RgbaImage;

/// BC1 block compressor producing 8 bytes per 4×4 tile, row-major.
pub struct Bc1Compressor;

impl BlockCompressor for Bc1Compressor {
    fn compress(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidDimensions(width, height));
        }

        let tiles_x = width.div_ceil(4);
        let tiles_y = height.div_ceil(4);
        let mut out = Vec::with_capacity((tiles_x * tiles_y) as usize * self.block_size());

        for tile_y in 0..tiles_y {
            for tile_x in 0..tiles_x {
                let tile = read_tile(image, tile_x * 4, tile_y * 4);
                out.extend_from_slice(&compress_tile(&tile));
            }
        }

        Ok(out)
    }

    fn block_size(&self) -> usize {
        8
    }
}

/// Read a 4×4 tile starting at `(x0, y0)`.
///
/// Reads past the image edge are clamped to the border pixel, so partial
/// edge tiles repeat their last row/column instead of bleeding black into
/// the endpoints.
fn read_tile(image: &RgbaImage, x0: u32, y0: u32) -> [[u8; 4]; 16] {
    let (width, height) = image.dimensions();
    let mut tile = [[0u8; 4]; 16];

    for row in 0..4u32 {
        for col in 0..4u32 {
            let x = (x0 + col).min(width - 1);
            let y = (y0 + row).min(height - 1);
            tile[(row * 4 + col) as usize] = image.get_pixel(x, y).0;
        }
    }

    tile
}

fn compress_tile(tile: &[[u8; 4]; 16]) -> [u8; 8] {
    let (mut c0, mut c1) = color_bounds(tile);

    // c0 > c1 keeps the block in opaque 4-color mode.
    if c0 < c1 {
        std::mem::swap(&mut c0, &mut c1);
    }

    let indices = select_indices(tile, c0, c1);

    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&c0.to_le_bytes());
    block[2..4].copy_from_slice(&c1.to_le_bytes());
    block[4..8].copy_from_slice(&indices.to_le_bytes());
    block
}

/// Per-channel bounding box of the tile, packed as RGB565 (max, min).
fn color_bounds(tile: &[[u8; 4]; 16]) -> (u16, u16) {
    let mut lo = [255u8; 3];
    let mut hi = [0u8; 3];

    for pixel in tile {
        for channel in 0..3 {
            lo[channel] = lo[channel].min(pixel[channel]);
            hi[channel] = hi[channel].max(pixel[channel]);
        }
    }

    (pack_rgb565(hi), pack_rgb565(lo))
}

/// Pick the closest palette entry for each pixel and pack the sixteen
/// 2-bit indices little-endian, pixel 0 in the low bits.
fn select_indices(tile: &[[u8; 4]; 16], c0: u16, c1: u16) -> u32 {
    let palette = [
        unpack_rgb565(c0),
        unpack_rgb565(c1),
        mix_thirds(unpack_rgb565(c0), unpack_rgb565(c1)),
        mix_thirds(unpack_rgb565(c1), unpack_rgb565(c0)),
    ];

    let mut indices = 0u32;
    for (i, pixel) in tile.iter().enumerate() {
        let mut best = 0u32;
        let mut best_dist = u32::MAX;
        for (candidate, color) in palette.iter().enumerate() {
            let dist = weighted_distance(pixel, color);
            if dist < best_dist {
                best_dist = dist;
                best = candidate as u32;
            }
        }
        indices |= best << (i * 2);
    }

    indices
}

fn pack_rgb565(rgb: [u8; 3]) -> u16 {
    let r = (rgb[0] >> 3) as u16;
    let g = (rgb[1] >> 2) as u16;
    let b = (rgb[2] >> 3) as u16;
    (r << 11) | (g << 5) | b
}

/// Expand RGB565 to 8-bit channels, replicating the high bits into the low
/// ones so full white maps back to 255.
fn unpack_rgb565(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// 2/3 `a` + 1/3 `b`, per channel.
fn mix_thirds(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    let mut out = [0u8; 3];
    for channel in 0..3 {
        out[channel] = ((2 * a[channel] as u16 + b[channel] as u16) / 3) as u8;
    }
    out
}

/// Squared color distance weighted toward green, which the eye resolves
/// best (R=3, G=6, B=1).
fn weighted_distance(pixel: &[u8; 4], rgb: &[u8; 3]) -> u32 {
    let dr = (pixel[0] as i32 - rgb[0] as i32) * 3;
    let dg = (pixel[1] as i32 - rgb[1] as i32) * 6;
    let db = pixel[2] as i32 - rgb[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
