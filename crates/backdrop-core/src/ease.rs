//! Interpolation helpers and pointer-proximity math.

use crate::geometry::Point;

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Hermite ease `t*t*(3-2t)` over `t` clamped to 0.0-1.0.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pointer influence falling off to zero at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub radius: f32,
}

impl Proximity {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    /// Linear closeness `1 - d/radius`, zero at and beyond the radius.
    pub fn closeness(&self, distance: f32) -> f32 {
        if self.radius <= 0.0 || distance >= self.radius {
            return 0.0;
        }
        1.0 - distance.max(0.0) / self.radius
    }

    /// Smoothstep-eased closeness.
    pub fn eased(&self, distance: f32) -> f32 {
        smoothstep(self.closeness(distance))
    }

    /// Eased closeness between an entity and the pointer.
    ///
    /// Compares squared distances first so far-away entities skip the square root.
    pub fn eased_between(&self, entity: Point, pointer: Point) -> f32 {
        let dist_sq = entity.distance_sq(pointer);
        if dist_sq >= self.radius * self.radius {
            return 0.0;
        }
        self.eased(dist_sq.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn test_proximity_endpoints() {
        let prox = Proximity::new(120.0);
        assert_eq!(prox.eased(0.0), 1.0);
        assert_eq!(prox.eased(120.0), 0.0);
        assert_eq!(prox.eased(500.0), 0.0);
    }

    #[test]
    fn test_proximity_monotonic() {
        let prox = Proximity::new(120.0);
        let mut last = prox.eased(0.0);
        for step in 1..=300 {
            let value = prox.eased(step as f32 * 0.5);
            assert!(value <= last, "eased rose at distance {}", step as f32 * 0.5);
            last = value;
        }
    }

    #[test]
    fn test_far_away_has_no_influence() {
        let prox = Proximity::new(5_000.0);
        assert_eq!(prox.eased_between(Point::new(0.0, 0.0), Point::FAR_AWAY), 0.0);
    }

    #[test]
    fn test_zero_radius() {
        assert_eq!(Proximity::new(0.0).eased(0.0), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    }
}
