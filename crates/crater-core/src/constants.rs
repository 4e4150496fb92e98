//! Shared constants. Server and clients must agree on every value here,
//! otherwise replayed shots land in different places.

use crate::geometry::Rect;

/// Default gravity of a freshly created map.
pub const DEFAULT_GRAVITY: f32 = 9.8;

/// Distance (in grid units) between two collision probes along the
/// dominant axis of a move.
pub const MOVE_STRIDE: i32 = 3;

/// Local bounding box of a generic physics body, relative to its position.
pub const DEFAULT_BODY_BOUND: Rect = Rect::new(-5, -5, 10, 10);

/// Local bounding box of a projectile, relative to its position.
pub const PROJECTILE_BOUND: Rect = Rect::new(-3, -3, 6, 6);

/// Pixels packed into one byte of a terrain row (MSB first).
pub const PIXELS_PER_BYTE: u32 = 8;

/// Extra byte at the end of every terrain row. Absorbs the carry of
/// a mask shifted by a sub-byte offset.
pub const ROW_PADDING_BYTES: usize = 1;

/// Size of the asset blob header: `i32 width`, `i32 height`.
pub const ASSET_HEADER_SIZE: usize = 8;
