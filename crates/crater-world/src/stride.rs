use crater_core::constants::MOVE_STRIDE;
use crater_core::geometry::Point;

/// Sub-step offsets of a straight move, every [`MOVE_STRIDE`] pixels along
/// the dominant axis.
///
/// The dominant axis is the one with the larger absolute delta (ties go to
/// y). For stride `i` the primary offset is `i * dir` and the secondary one
/// is `i * dir * secondary_delta / steps` with integer division truncating
/// toward zero. `dir` is the sign of the primary delta and is applied to the
/// secondary term too, so when both deltas are negative the secondary
/// coordinate walks the positive way. Collision outcomes depend on this exact
/// sequence; keep it.
///
/// Deltas are fixed when the path is built, but each offset is applied to
/// wherever the body is when that stride is tried, so a contact handler that
/// moves the body shifts every later stride with it.
///
/// The full delta itself is not yielded unless a stride lands on it.
#[derive(Debug, Clone)]
pub struct StridePath {
    along_x: bool,
    steps: i64,
    direction: i64,
    secondary_delta: i64,
    i: i64,
}

/// Displacement of one stride, relative to the body's position at the time
/// the stride is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideOffset {
    pub dx: i64,
    pub dy: i64,
}

impl StrideOffset {
    /// `at` moved by this offset, saturating at the `i32` range.
    pub fn applied_to(self, at: Point) -> Point {
        Point::new(saturate(at.x as i64 + self.dx), saturate(at.y as i64 + self.dy))
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl StridePath {
    pub fn new(start: Point, end: Point) -> Self {
        let dx = end.x as i64 - start.x as i64;
        let dy = end.y as i64 - start.y as i64;
        let along_x = dx.abs() > dy.abs();
        let (primary, secondary_delta) = if along_x { (dx, dy) } else { (dy, dx) };
        Self {
            along_x,
            steps: primary.abs(),
            direction: if primary > 0 { 1 } else { -1 },
            secondary_delta,
            i: 1,
        }
    }
}

impl Iterator for StridePath {
    type Item = StrideOffset;

    fn next(&mut self) -> Option<StrideOffset> {
        if self.i > self.steps {
            return None;
        }
        let i = self.i;
        self.i += MOVE_STRIDE as i64;

        let primary = i * self.direction;
        let secondary = i * self.direction * self.secondary_delta / self.steps;
        Some(if self.along_x {
            StrideOffset { dx: primary, dy: secondary }
        } else {
            StrideOffset { dx: secondary, dy: primary }
        })
    }
}
