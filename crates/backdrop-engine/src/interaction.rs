//! Pointer position relative to a host region.

use std::time::Duration;

use backdrop_core::Point;

/// Tracks the latest pointer position in region-local logical pixels.
///
/// The point is [`Point::FAR_AWAY`] whenever no pointer is over the interaction surface.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTracker {
    point: Point,
    moved_at: Option<Duration>,
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self {
            point: Point::FAR_AWAY,
            moved_at: None,
        }
    }

    /// Record a move at `client` coordinates, translated by the region's top-left `origin`.
    pub fn on_move(&mut self, client: Point, origin: Point, now: Duration) {
        self.point = client.relative_to(origin);
        self.moved_at = Some(now);
    }

    /// The pointer left the interaction surface.
    pub fn on_leave(&mut self) {
        self.point = Point::FAR_AWAY;
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Host time of the last move, if any.
    pub fn moved_at(&self) -> Option<Duration> {
        self.moved_at
    }

    pub fn is_active(&self) -> bool {
        self.point != Point::FAR_AWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_far_away() {
        let tracker = InteractionTracker::new();
        assert_eq!(tracker.point(), Point::FAR_AWAY);
        assert!(!tracker.is_active());
        assert_eq!(tracker.moved_at(), None);
    }

    #[test]
    fn test_move_is_region_local() {
        let mut tracker = InteractionTracker::new();
        tracker.on_move(
            Point::new(450.0, 320.0),
            Point::new(400.0, 160.0),
            Duration::from_millis(30),
        );
        assert_eq!(tracker.point(), Point::new(50.0, 160.0));
        assert!(tracker.is_active());
        assert_eq!(tracker.moved_at(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_leave_resets_to_sentinel() {
        let mut tracker = InteractionTracker::new();
        tracker.on_move(Point::new(1.0, 1.0), Point::default(), Duration::ZERO);
        tracker.on_leave();
        assert_eq!(tracker.point(), Point::FAR_AWAY);
        assert_eq!(tracker.moved_at(), Some(Duration::ZERO));
    }
}
