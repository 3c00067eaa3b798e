//! The environment a loop is mounted into.

use logoloop_foundation::{
    HostCapabilities, ImageId, ImageStatus, Orientation, ResizeTarget, SequenceMeasurement,
};

use crate::node::LoopTree;
use crate::style::transform_css;

/// Track translation written by the motion loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackTransform {
    pub orientation: Orientation,
    pub offset: f32,
}

impl TrackTransform {
    pub fn new(orientation: Orientation, offset: f32) -> Self {
        Self {
            orientation,
            offset,
        }
    }

    pub fn to_css(&self) -> String {
        transform_css(self.orientation, self.offset)
    }
}

/// Host side of a mounted loop: a DOM binding, a test fake or a headless
/// simulator.
///
/// Hosts only report and apply. Resize and image events are fed back through
/// [`MountedLoop`](crate::MountedLoop) by whoever owns the host.
pub trait LoopHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::default()
    }

    /// Mirrors `tree` into the host, replacing what was rendered before.
    fn render(&mut self, tree: &LoopTree);

    /// Reads container, parent and reference-copy sizes. `None` while the
    /// anchors are not attached.
    fn measure(&self) -> Option<SequenceMeasurement>;

    /// Load state of an image of the reference copy.
    fn image_status(&self, image: ImageId) -> ImageStatus;

    /// Pins the container height, or releases the pin with `None`.
    fn set_container_height(&mut self, height: Option<f32>);

    fn apply_transform(&mut self, transform: TrackTransform);

    /// Compositor hint on the track, e.g. `will-change: transform`.
    fn set_will_change(&mut self, hint: Option<&str>);

    /// Starts element-level resize observation of `targets`.
    fn observe_resize(&mut self, targets: &[ResizeTarget]);

    /// Starts listening for window resize instead of observing elements.
    fn listen_window_resize(&mut self);

    /// Detaches whichever resize subscription is active.
    fn detach_resize(&mut self);
}
