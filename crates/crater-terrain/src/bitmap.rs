//! Packed one-bit-per-pixel terrain layer.
//!
//! Row layout: `stride = ceil(width / 8) + 1` bytes, pixel `x` lives in byte
//! `x / 8` at bit `7 - x % 8` (MSB first). The trailing padding byte is never
//! addressed by pixel queries; it only exists so that a mask blitted at a
//! sub-byte offset always has a byte to carry into.

use crater_core::constants::{PIXELS_PER_BYTE, ROW_PADDING_BYTES};
use crater_core::geometry::{Point, Rect};

use crate::asset;
use crate::error::TerrainError;

/// Byte stride of a row `width` pixels wide.
pub fn row_stride(width: u32) -> usize {
    width.div_ceil(PIXELS_PER_BYTE) as usize + ROW_PADDING_BYTES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlitOp {
    /// Clear destination pixels where the mask is solid.
    Remove,
    /// Set destination pixels where the mask is solid.
    Add,
}

/// One terrain layer (or a hole/border mask, which uses the same layout).
///
/// `Clone` is a deep copy: the clone never shares bits with the original.
/// Equality compares size, pixels, flags and cached bounds.
#[derive(Debug, Clone)]
pub struct TerrainBitmap {
    width: u32,
    height: u32,
    stride: usize,
    bits: Vec<u8>,
    /// Tight box around the solid pixels at construction time. Digging does
    /// not update it, so afterwards it may overstate the solid area.
    bounds: Rect,
    /// Box holding every solid pixel: `bounds` grown by each write that
    /// can set pixels. Remove blits are clipped to it.
    solid_hull: Rect,
    destructible: bool,
}

impl PartialEq for TerrainBitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.destructible == other.destructible
            && self.bounds == other.bounds
            && self.bits == other.bits
    }
}

impl Eq for TerrainBitmap {}

impl TerrainBitmap {
    /// Wrap an existing packed bit buffer. The buffer must hold exactly
    /// `stride * height` bytes.
    pub fn from_bits(
        bits: Vec<u8>,
        width: u32,
        height: u32,
        destructible: bool,
    ) -> Result<Self, TerrainError> {
        let stride = row_stride(width);
        let expected = stride * height as usize;
        if bits.len() != expected {
            return Err(TerrainError::BitsLength {
                expected,
                actual: bits.len(),
            });
        }
        Ok(Self::with_scanned_bounds(
            width,
            height,
            stride,
            bits,
            destructible,
        ))
    }

    /// All-empty layer.
    pub fn blank(width: u32, height: u32, destructible: bool) -> Self {
        let stride = row_stride(width);
        let bits = vec![0u8; stride * height as usize];
        Self::with_scanned_bounds(width, height, stride, bits, destructible)
    }

    /// Layer with every in-range pixel solid. Padding bits stay clear.
    pub fn filled(width: u32, height: u32, destructible: bool) -> Self {
        let stride = row_stride(width);
        let mut bits = vec![0u8; stride * height as usize];
        let full_bytes = (width / PIXELS_PER_BYTE) as usize;
        let rem = width % PIXELS_PER_BYTE;
        for row in bits.chunks_exact_mut(stride) {
            row[..full_bytes].fill(0xFF);
            if rem != 0 {
                row[full_bytes] = 0xFF << (PIXELS_PER_BYTE - rem);
            }
        }
        Self::with_scanned_bounds(width, height, stride, bits, destructible)
    }

    /// Decode an asset blob (`i32 width, i32 height, packed rows`).
    pub fn from_asset(bytes: &[u8], destructible: bool) -> Result<Self, TerrainError> {
        asset::decode_asset(bytes, destructible)
    }

    fn with_scanned_bounds(
        width: u32,
        height: u32,
        stride: usize,
        bits: Vec<u8>,
        destructible: bool,
    ) -> Self {
        let mut layer = Self {
            width,
            height,
            stride,
            bits,
            bounds: Rect::ZERO,
            solid_hull: Rect::ZERO,
            destructible,
        };
        layer.bounds = layer.scan_bounds();
        layer.solid_hull = layer.bounds;
        log::debug!(
            "terrain layer {}x{} (destructible: {}) solid bounds {:?}",
            width,
            height,
            destructible,
            layer.bounds
        );
        layer
    }

    /// Tight rectangle around every solid in-range pixel, or `Rect::ZERO`.
    fn scan_bounds(&self) -> Rect {
        let width = self.width as i32;
        let mut min = Point::new(i32::MAX, i32::MAX);
        let mut max = Point::new(i32::MIN, i32::MIN);
        let mut found = false;

        for y in 0..self.height as usize {
            for (byte_index, &byte) in self.row(y).iter().enumerate() {
                if byte == 0 {
                    continue;
                }
                for bit in 0..PIXELS_PER_BYTE {
                    let x = (byte_index as u32 * PIXELS_PER_BYTE + bit) as i32;
                    if x >= width {
                        break;
                    }
                    if byte & (0x80 >> bit) != 0 {
                        min = min.min(Point::new(x, y as i32));
                        max = max.max(Point::new(x, y as i32));
                        found = true;
                    }
                }
            }
        }

        if found {
            Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1)
        } else {
            Rect::ZERO
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, padding included.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn is_destructible(&self) -> bool {
        self.destructible
    }

    /// Construction-time solid bounds. A fast-reject cache, not ground truth
    /// once the layer has been dug.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Box guaranteed to hold every solid pixel. Starts as [`bounds`] and
    /// only grows; digging never shrinks it.
    ///
    /// [`bounds`]: TerrainBitmap::bounds
    pub fn solid_hull(&self) -> Rect {
        self.solid_hull
    }

    /// Full pixel extent `[0, width) x [0, height)`.
    pub fn extent(&self) -> Rect {
        Rect::from_size(self.width as i32, self.height as i32)
    }

    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.bits[start..start + self.stride]
    }

    /// Byte index and bit flag of an in-range pixel.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if !self.extent().contains(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let flag = 0x80u8 >> (x % PIXELS_PER_BYTE as usize);
        Some((y * self.stride + x / PIXELS_PER_BYTE as usize, flag))
    }

    /// Whether the pixel is clear. Anything outside the layer is empty.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        match self.locate(x, y) {
            Some((index, flag)) => self.bits[index] & flag == 0,
            None => true,
        }
    }

    /// Broad-phase check of the rectangle's four corners (exclusive right and
    /// bottom edges). A solid region that touches no corner is not seen.
    pub fn is_rectangle_empty_quick(&self, rect: Rect) -> bool {
        rect.corners().iter().all(|c| self.is_empty(c.x, c.y))
    }

    /// Set or clear one pixel. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, solid: bool) {
        if let Some((index, flag)) = self.locate(x, y) {
            if solid {
                self.solid_hull = self.solid_hull.union(&Rect::new(x, y, 1, 1));
                self.bits[index] |= flag;
            } else {
                self.bits[index] &= !flag;
            }
        }
    }

    /// Make every in-range pixel of `rect` solid.
    pub fn fill_rect(&mut self, rect: Rect) {
        let Some(clip) = rect.intersection(&self.extent()) else {
            return;
        };
        self.solid_hull = self.solid_hull.union(&clip);
        for y in clip.top()..clip.bottom() {
            for x in clip.left()..clip.right() {
                if let Some((index, flag)) = self.locate(x, y) {
                    self.bits[index] |= flag;
                }
            }
        }
    }

    /// Number of solid in-range pixels. Padding bits are not counted.
    pub fn solid_count(&self) -> u64 {
        let full_bytes = (self.width / PIXELS_PER_BYTE) as usize;
        let rem = self.width % PIXELS_PER_BYTE;
        let tail_mask = if rem == 0 {
            0
        } else {
            0xFFu8 << (PIXELS_PER_BYTE - rem)
        };
        (0..self.height as usize)
            .map(|y| {
                let row = self.row(y);
                let full: u32 = row[..full_bytes].iter().map(|b| b.count_ones()).sum();
                full + (row[full_bytes] & tail_mask).count_ones()
            })
            .map(u64::from)
            .sum()
    }

    /// Blast a crater centred on `(cx, cy)`.
    ///
    /// The hole mask's solid pixels are cleared, then the optional border
    /// mask's solid pixels are set, each placed with its top-left at
    /// `(cx - w / 2, cy - h / 2)`, saturating at the `i32` range. Does nothing
    /// on an indestructible layer or without a hole. [`bounds`] is left as it
    /// was; only the solid hull grows to cover painted border pixels.
    ///
    /// [`bounds`]: TerrainBitmap::bounds
    pub fn dig(
        &mut self,
        cx: i32,
        cy: i32,
        hole: Option<&TerrainBitmap>,
        border: Option<&TerrainBitmap>,
    ) {
        if !self.destructible {
            return;
        }
        let Some(hole) = hole else {
            return;
        };
        self.blit(hole.centered_on(cx, cy), hole, BlitOp::Remove);
        if let Some(border) = border {
            self.blit(border.centered_on(cx, cy), border, BlitOp::Add);
        }
    }

    /// Top-left corner placing this mask's centre on `(cx, cy)`.
    fn centered_on(&self, cx: i32, cy: i32) -> Point {
        Point::new(
            cx.saturating_sub((self.width / 2) as i32),
            cy.saturating_sub((self.height / 2) as i32),
        )
    }

    /// Merge `mask` into this layer with its top-left at `origin`.
    ///
    /// Source bytes are walked a row at a time. With `shift = origin.x mod 8`
    /// each source byte contributes `src >> shift` to its destination byte and
    /// `src << (8 - shift)` to the next one, so the carry runs along the row.
    /// Only pixels inside both the placed mask and this layer are written;
    /// removal is further limited to the solid hull, outside which there is
    /// nothing to clear.
    fn blit(&mut self, origin: Point, mask: &TerrainBitmap, op: BlitOp) {
        let placed = Rect::new(origin.x, origin.y, mask.width as i32, mask.height as i32);
        let reach = match op {
            BlitOp::Remove => self.solid_hull,
            BlitOp::Add => self.extent(),
        };
        let Some(clip) = placed
            .intersection(&self.extent())
            .and_then(|r| r.intersection(&reach))
        else {
            return;
        };
        if op == BlitOp::Add {
            self.solid_hull = self.solid_hull.union(&clip);
        }

        let bits_per_byte = PIXELS_PER_BYTE as i32;
        let shift = origin.x.rem_euclid(bits_per_byte) as u32;
        let first_byte = origin.x.div_euclid(bits_per_byte);
        let dst_lo = clip.left() / bits_per_byte;
        let dst_hi = (clip.right() - 1) / bits_per_byte;

        for y in clip.top()..clip.bottom() {
            let src_row = mask.row((y - origin.y) as usize);
            let dst_row = y as usize * self.stride;
            let mut carry = 0u8;

            // One extra iteration flushes the carry of the last source byte.
            for k in 0..=src_row.len() {
                let src = src_row.get(k).copied().unwrap_or(0);
                let combined = (src >> shift) | carry;
                carry = if shift == 0 { 0 } else { src << (8 - shift) };

                let dst_byte = first_byte + k as i32;
                if dst_byte < dst_lo {
                    continue;
                }
                if dst_byte > dst_hi {
                    break;
                }

                let bits = combined & column_mask(dst_byte, clip.left(), clip.right());
                let target = &mut self.bits[dst_row + dst_byte as usize];
                match op {
                    BlitOp::Remove => *target &= !bits,
                    BlitOp::Add => *target |= bits,
                }
            }
        }
    }
}

/// Bits of destination byte `byte_index` whose pixel column lies in
/// `[left, right)`.
fn column_mask(byte_index: i32, left: i32, right: i32) -> u8 {
    let base = byte_index * PIXELS_PER_BYTE as i32;
    let from = (left - base).clamp(0, 8);
    let to = (right - base).clamp(0, 8);
    if to <= from {
        return 0;
    }
    let ones = (0xFFu16 << (8 - (to - from))) as u8;
    ones >> from
}
