//! Logical and physical geometry.

/// A position in logical (layout) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Sentinel meaning "no interaction": far outside any region and any proximity radius.
    pub const FAR_AWAY: Point = Point {
        x: -100_000.0,
        y: -100_000.0,
    };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Translate into the coordinate space whose origin is `origin`.
    pub fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.width
            && p.y < self.origin.y + self.size.height
    }
}

/// Backing-store dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// `ceil(logical * dpr)` per axis, never smaller than 1x1.
    pub fn from_logical(size: Size, dpr: f32) -> Self {
        let scale = |v: f32| ((v.max(0.0) * dpr).ceil() as u32).max(1);
        Self {
            width: scale(size.width),
            height: scale(size.height),
        }
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_rounds_up() {
        let size = PhysicalSize::from_logical(Size::new(801.0, 600.0), 0.125);
        assert_eq!(size, PhysicalSize { width: 101, height: 75 });

        let size = PhysicalSize::from_logical(Size::new(100.0, 50.0), 2.0);
        assert_eq!(size, PhysicalSize { width: 200, height: 100 });
    }

    #[test]
    fn test_physical_size_at_least_one() {
        let size = PhysicalSize::from_logical(Size::new(0.0, 0.0), 1.0);
        assert_eq!(size, PhysicalSize { width: 1, height: 1 });
    }

    #[test]
    fn test_relative_to() {
        let p = Point::new(120.0, 80.0).relative_to(Point::new(100.0, 20.0));
        assert_eq!(p, Point::new(20.0, 60.0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.9, 29.9)));
        assert!(!rect.contains(Point::new(30.0, 15.0)));
        assert!(!rect.contains(Point::FAR_AWAY));
    }
}
