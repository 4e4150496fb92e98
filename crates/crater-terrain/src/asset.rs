//! Terrain asset blob: `i32 width`, `i32 height` (little-endian), then
//! `height` rows of `ceil(width / 8) + 1` bytes, MSB first. Hole and border
//! masks use the same layout.

use crater_core::constants::ASSET_HEADER_SIZE;

use crate::bitmap::{row_stride, TerrainBitmap};
use crate::error::TerrainError;

/// Decode an asset blob into a terrain layer.
///
/// A blob shorter than its declared size is rejected outright. Bytes past the
/// declared size are ignored.
pub fn decode_asset(bytes: &[u8], destructible: bool) -> Result<TerrainBitmap, TerrainError> {
    if bytes.len() < ASSET_HEADER_SIZE {
        return Err(TerrainError::HeaderTooSmall(bytes.len(), ASSET_HEADER_SIZE));
    }

    let width = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let height = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if width < 0 || height < 0 {
        return Err(TerrainError::InvalidDimensions { width, height });
    }

    let body_len = row_stride(width as u32)
        .checked_mul(height as usize)
        .ok_or(TerrainError::InvalidDimensions { width, height })?;
    let expected = ASSET_HEADER_SIZE + body_len;
    if bytes.len() < expected {
        return Err(TerrainError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        log::debug!(
            "ignoring {} trailing bytes after {}x{} terrain asset",
            bytes.len() - expected,
            width,
            height
        );
    }

    let bits = bytes[ASSET_HEADER_SIZE..expected].to_vec();
    TerrainBitmap::from_bits(bits, width as u32, height as u32, destructible)
}

/// Encode a layer into the asset blob layout accepted by [`decode_asset`].
pub fn encode_asset(layer: &TerrainBitmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(ASSET_HEADER_SIZE + layer.bits().len());
    out.extend_from_slice(&(layer.width() as i32).to_le_bytes());
    out.extend_from_slice(&(layer.height() as i32).to_le_bytes());
    out.extend_from_slice(layer.bits());
    out
}
