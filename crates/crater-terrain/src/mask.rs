//! Builders for explosion masks.
//!
//! A hole mask marks the pixels an explosion removes; a border mask marks the
//! rim re-solidified around it. Both are plain [`TerrainBitmap`]s and are
//! centred on the impact point by `dig`.

use crate::bitmap::TerrainBitmap;

/// Disc of the given diameter. Pixel `(x, y)` is solid when its distance to
/// `(r, r)` is strictly less than `r = diameter / 2`.
pub fn circle(diameter: u32) -> TerrainBitmap {
    let r = (diameter / 2) as i64;
    disc_band(diameter, 0, r * r)
}

/// Ring of the given outer diameter, `thickness` pixels wide, drawn just
/// inside the outer edge. Used as a crater border.
pub fn ring(diameter: u32, thickness: u32) -> TerrainBitmap {
    let r = (diameter / 2) as i64;
    let inner = (r - thickness as i64).max(0);
    disc_band(diameter, inner * inner, r * r)
}

/// Square mask where `min_sq <= d^2 < max_sq`, `d` measured from `(r, r)`.
fn disc_band(diameter: u32, min_sq: i64, max_sq: i64) -> TerrainBitmap {
    let r = (diameter / 2) as i64;
    let mut mask = TerrainBitmap::blank(diameter, diameter, false);
    for y in 0..diameter as i64 {
        for x in 0..diameter as i64 {
            let d_sq = (x - r) * (x - r) + (y - r) * (y - r);
            if d_sq >= min_sq && d_sq < max_sq {
                mask.set_pixel(x as i32, y as i32, true);
            }
        }
    }
    // Rebuild so the cached bounds describe the drawn shape.
    TerrainBitmap::from_bits(mask.bits().to_vec(), diameter, diameter, false)
        .unwrap_or(mask)
}
