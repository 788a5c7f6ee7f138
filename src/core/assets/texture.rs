//! Image Data
//!
//! Decoded RGBA images ready for upload, with generated placeholders for
//! when an asset cannot be found or decoded.
//!
//! Features:
//! - Decode PNG/JPEG from bytes or disk
//! - Checkerboard placeholder for tiles
//! - Filled disc placeholder for sprites

use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Size of generated placeholder images.
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Checkerboard tile size in pixels.
const CHECKER_TILE_SIZE: u32 = 8;

// ============================================================================
// Image Data
// ============================================================================

/// RGBA8 pixels plus dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    /// RGBA pixel data, row-major.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// True when this is a generated stand-in rather than the real asset.
    pub is_placeholder: bool,
}

impl ImageData {
    /// Decodes an encoded image (PNG, JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
            is_placeholder: false,
        })
    }

    /// Decodes an image file from disk.
    pub fn load_from_file(path: &Path) -> Result<Self, image::ImageError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
            is_placeholder: false,
        })
    }

    /// Generates a checkerboard pattern.
    pub fn generate_checkerboard(size: u32, color1: [u8; 4], color2: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let checker_x = (x / CHECKER_TILE_SIZE) % 2;
                let checker_y = (y / CHECKER_TILE_SIZE) % 2;
                let color = if checker_x == checker_y { color1 } else { color2 };
                data.extend_from_slice(&color);
            }
        }

        Self {
            data,
            width: size,
            height: size,
            is_placeholder: true,
        }
    }

    /// Generates a filled disc on a transparent background.
    pub fn generate_disc(size: u32, color: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let radius = size as f32 * 0.5;

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - radius;
                let dy = y as f32 + 0.5 - radius;
                if dx * dx + dy * dy <= radius * radius {
                    data.extend_from_slice(&color);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }

        Self {
            data,
            width: size,
            height: size,
            is_placeholder: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

// ============================================================================
// Placeholder Colors
// ============================================================================

/// Star placeholder (pale yellow, matches the label color).
pub const STAR_COLOR: [u8; 4] = [251, 251, 172, 255];

/// Sand placeholder colors (tan checkerboard).
pub const SAND_COLOR_1: [u8; 4] = [194, 178, 128, 255];
pub const SAND_COLOR_2: [u8; 4] = [218, 194, 145, 255];

/// Anything else that failed to load.
pub const MISSING_COLOR_1: [u8; 4] = [255, 0, 255, 255];
pub const MISSING_COLOR_2: [u8; 4] = [0, 0, 0, 255];
