use glam::IVec2;

/// Integer grid point (pixel coordinates, y grows downwards).
pub type Point = IVec2;

/// Axis-aligned integer rectangle given by its top-left corner and size.
///
/// `right()` and `bottom()` are exclusive edges: `x + width`, `y + height`.
/// Edge and translation arithmetic saturates at the `i32` range, so
/// rectangles pushed past it are clamped against the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Zero-area rectangle at the origin.
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering `[0, width) x [0, height)`.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub const fn top_left(&self) -> Point {
        IVec2::new(self.x, self.y)
    }

    /// True when the rectangle covers no pixel.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Copy of this rectangle moved by `(dx, dy)`.
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Copy of this rectangle moved by `offset`.
    pub fn offset_by(&self, offset: Point) -> Self {
        self.translated(offset.x, offset.y)
    }

    /// Open-interval overlap test: rectangles that only share an edge do
    /// not intersect.
    pub const fn intersects(&self, other: &Rect) -> bool {
        !(other.left() >= self.right()
            || other.right() <= self.left()
            || other.top() >= self.bottom()
            || other.bottom() <= self.top())
    }

    /// Overlapping region of two rectangles, `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(
                left,
                top,
                right.saturating_sub(left),
                bottom.saturating_sub(top),
            ))
        } else {
            None
        }
    }

    /// Smallest rectangle covering both. Empty rectangles contribute nothing.
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// Whether `(x, y)` lies inside the half-open rectangle.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    /// The four corner probes used by quick emptiness tests, using the
    /// exclusive right/bottom edges:
    /// (right, bottom), (left, bottom), (right, top), (left, top).
    pub const fn corners(&self) -> [Point; 4] {
        [
            IVec2::new(self.right(), self.bottom()),
            IVec2::new(self.left(), self.bottom()),
            IVec2::new(self.right(), self.top()),
            IVec2::new(self.left(), self.top()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_exclusive() {
        let r = Rect::new(-3, -3, 6, 6);
        assert_eq!(r.left(), -3);
        assert_eq!(r.right(), 3);
        assert_eq!(r.top(), -3);
        assert_eq!(r.bottom(), 3);
        assert!(r.contains(-3, -3));
        assert!(!r.contains(3, 0));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let right_neighbor = Rect::new(10, 0, 10, 10);
        let below_neighbor = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&right_neighbor));
        assert!(!right_neighbor.intersects(&a));
        assert!(!a.intersects(&below_neighbor));

        let overlapping = Rect::new(9, 9, 10, 10);
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn test_intersection_region() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 0, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(20, 20, 1, 1)), None);
    }

    #[test]
    fn test_translated_keeps_size() {
        let r = Rect::new(-5, -5, 10, 10).translated(50, 40);
        assert_eq!(r, Rect::new(45, 35, 10, 10));
        assert_eq!(
            Rect::new(1, 2, 3, 4).offset_by(IVec2::new(-1, -2)),
            Rect::new(0, 0, 3, 4)
        );
    }

    #[test]
    fn test_corners_use_exclusive_edges() {
        let corners = Rect::new(2, 3, 4, 5).corners();
        assert!(corners.contains(&IVec2::new(6, 8)));
        assert!(corners.contains(&IVec2::new(2, 3)));
        assert!(corners.contains(&IVec2::new(6, 3)));
        assert!(corners.contains(&IVec2::new(2, 8)));
    }

    #[test]
    fn test_zero_rect_is_empty() {
        assert!(Rect::ZERO.is_empty());
        assert!(!Rect::from_size(1, 1).is_empty());
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, -2, 2, 3);
        assert_eq!(a.union(&b), Rect::new(0, -2, 12, 6));
        assert_eq!(a.union(&Rect::ZERO), a);
        assert_eq!(Rect::ZERO.union(&b), b);
    }

    #[test]
    fn test_edges_saturate_at_range() {
        let r = Rect::new(i32::MAX - 2, i32::MAX - 1, 10, 10);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert!(!r.contains(i32::MAX, i32::MAX));

        let moved = Rect::new(-3, -3, 6, 6).translated(i32::MIN, i32::MIN);
        assert_eq!(moved.top_left(), IVec2::new(i32::MIN, i32::MIN));
        assert_eq!(
            Rect::new(-3, -3, 6, 6).offset_by(IVec2::new(i32::MAX, 0)).right(),
            i32::MAX
        );
    }

    #[test]
    fn test_intersection_near_limits() {
        let huge = Rect::new(i32::MIN, 0, i32::MAX, 10);
        let far = Rect::new(-10, 0, i32::MAX, 10);
        assert_eq!(huge.intersection(&far), Some(Rect::new(-10, 0, 9, 10)));
    }
}
