/// Axis-aligned rectangle in document pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn area(&self) -> f32 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Grow each edge outwards by the matching inset. Negative insets shrink.
    pub fn outset(&self, insets: Insets) -> Self {
        Self::new(
            self.x - insets.left,
            self.y - insets.top,
            self.w + insets.left + insets.right,
            self.h + insets.top + insets.bottom,
        )
    }

    /// Overlap of two rectangles.
    ///
    /// Edge-adjacent rectangles yield a zero-area intersection rather than
    /// `None`, so a zero-height element sitting on the boundary still counts
    /// as touching.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Per-edge distances, in CSS `top right bottom left` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Expand a CSS shorthand list of one to four values.
    pub fn from_shorthand(values: &[f32]) -> Option<Self> {
        let [top, right, bottom, left] = match values {
            [] => return None,
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left, ..] => [*top, *right, *bottom, *left],
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        let hit = a.intersection(&b).unwrap();
        assert_eq!(hit, Rect::new(50.0, 80.0, 50.0, 20.0));
        assert_eq!(hit.area(), 1000.0);
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 20.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn touching_edges_give_empty_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        let hit = a.intersection(&b).unwrap();
        assert_eq!(hit.area(), 0.0);
    }

    #[test]
    fn negative_outset_shrinks() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let shrunk = viewport.outset(Insets {
            bottom: -80.0,
            ..Insets::ZERO
        });
        assert_eq!(shrunk.bottom(), 720.0);
        assert_eq!(shrunk.top(), 0.0);
    }

    #[test]
    fn shorthand_expansion() {
        let insets = Insets::from_shorthand(&[1.0, 2.0]).unwrap();
        assert_eq!(insets.top, 1.0);
        assert_eq!(insets.right, 2.0);
        assert_eq!(insets.bottom, 1.0);
        assert_eq!(insets.left, 2.0);
        assert!(Insets::from_shorthand(&[]).is_none());
    }
}
