//! Maps browser input into loop events.

use logoloop_foundation::{
    HostCapabilities, Point, PointerEvent, PointerEventKind, PointerTarget,
};

pub struct WebPlatform {
    scale_factor: f64,
}

impl WebPlatform {
    pub fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale_factor = factor;
        } else {
            log::warn!("ignoring invalid device pixel ratio {}", factor);
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn pointer_position(&self, x: f64, y: f64) -> Point {
        Point {
            x: (x / self.scale_factor) as f32,
            y: (y / self.scale_factor) as f32,
        }
    }

    pub fn pointer_event(
        &self,
        kind: PointerEventKind,
        target: PointerTarget,
        x: f64,
        y: f64,
    ) -> PointerEvent {
        let logical = self.pointer_position(x, y);
        PointerEvent::new(kind, target, logical)
    }

    /// Capabilities of the page, given whether `ResizeObserver` exists.
    pub fn detect_capabilities(has_resize_observer: bool) -> HostCapabilities {
        HostCapabilities {
            resize_observer: has_resize_observer,
        }
    }
}

impl Default for WebPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Axis-aligned bounds in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTransition {
    Entered,
    Left,
}

/// Derives track hover from a raw pointer stream.
///
/// Enter and leave events aimed at items are ignored, so moving between
/// adjacent items never toggles hover. Hosts without enter/leave events can
/// feed moves instead; they are hit-tested against the track bounds.
#[derive(Debug, Default)]
pub struct HoverTracker {
    inside: bool,
    track_bounds: Option<Rect>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_track_bounds(&mut self, bounds: Rect) {
        self.track_bounds = Some(bounds);
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn on_event(&mut self, event: &PointerEvent) -> Option<HoverTransition> {
        let inside = match (event.kind, event.target) {
            (PointerEventKind::Enter, PointerTarget::Track) => true,
            (PointerEventKind::Leave, PointerTarget::Track) => false,
            (PointerEventKind::Enter | PointerEventKind::Leave, _) => return None,
            (PointerEventKind::Cancel, _) => false,
            (PointerEventKind::Move, _) => match self.track_bounds {
                Some(bounds) => bounds.contains(event.position),
                None => return None,
            },
            (PointerEventKind::Down | PointerEventKind::Up, _) => return None,
        };
        self.transition_to(inside)
    }

    fn transition_to(&mut self, inside: bool) -> Option<HoverTransition> {
        if self.inside == inside {
            return None;
        }
        self.inside = inside;
        Some(if inside {
            HoverTransition::Entered
        } else {
            HoverTransition::Left
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: PointerEventKind, target: PointerTarget, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(kind, target, Point { x, y })
    }

    #[test]
    fn test_pointer_event_is_scaled() {
        let platform = WebPlatform::new(2.0);
        let event = platform.pointer_event(PointerEventKind::Move, PointerTarget::Track, 200.0, 50.0);
        assert_eq!(event.position, Point { x: 100.0, y: 25.0 });
        assert_eq!(event.global_position, event.position);
    }

    #[test]
    fn test_invalid_scale_factor_is_ignored() {
        let mut platform = WebPlatform::new(1.5);
        platform.set_scale_factor(0.0);
        assert_eq!(platform.scale_factor(), 1.5);
    }

    #[test]
    fn test_item_crossings_do_not_toggle_hover() {
        let mut tracker = HoverTracker::new();
        let item = |index| PointerTarget::Item { copy: 0, index };

        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Enter, PointerTarget::Track, 5.0, 5.0)),
            Some(HoverTransition::Entered)
        );
        assert_eq!(tracker.on_event(&event(PointerEventKind::Leave, item(0), 50.0, 5.0)), None);
        assert_eq!(tracker.on_event(&event(PointerEventKind::Enter, item(1), 50.0, 5.0)), None);
        assert!(tracker.is_inside());
        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Leave, PointerTarget::Track, 900.0, 5.0)),
            Some(HoverTransition::Left)
        );
    }

    #[test]
    fn test_moves_are_hit_tested() {
        let mut tracker = HoverTracker::new();
        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Move, PointerTarget::Outside, 10.0, 10.0)),
            None
        );
        tracker.set_track_bounds(Rect::new(0.0, 0.0, 400.0, 48.0));
        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Move, PointerTarget::Outside, 10.0, 10.0)),
            Some(HoverTransition::Entered)
        );
        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Move, PointerTarget::Outside, 20.0, 10.0)),
            None
        );
        assert_eq!(
            tracker.on_event(&event(PointerEventKind::Move, PointerTarget::Outside, 20.0, 80.0)),
            Some(HoverTransition::Left)
        );
    }

    #[test]
    fn test_capabilities() {
        assert!(WebPlatform::detect_capabilities(true).resize_observer);
        assert!(!WebPlatform::detect_capabilities(false).resize_observer);
    }
}
