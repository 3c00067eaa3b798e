//! Headless host that lays cards out at a fixed width.

use logoloop_foundation::{
    sequence_extent_of, HostCapabilities, ImageId, ImageStatus, ResizeTarget,
    SequenceMeasurement, Size,
};
use logoloop_platform_web::WebPlatform;
use logoloop_ui::style::GAP_VAR;
use logoloop_ui::{Anchor, LoopHost, LoopTree, TrackTransform};

pub struct PreviewHost {
    viewport: Size,
    card_width: f32,
    tree: Option<LoopTree>,
    pinned_height: Option<f32>,
    last_transform: Option<TrackTransform>,
    transform_writes: usize,
    observing: bool,
}

impl PreviewHost {
    pub fn new(viewport: Size, card_width: f32) -> Self {
        Self {
            viewport,
            card_width,
            tree: None,
            pinned_height: None,
            last_transform: None,
            transform_writes: 0,
            observing: false,
        }
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn tree(&self) -> Option<&LoopTree> {
        self.tree.as_ref()
    }

    pub fn last_transform(&self) -> Option<TrackTransform> {
        self.last_transform
    }

    pub fn transform_writes(&self) -> usize {
        self.transform_writes
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }
}

impl LoopHost for PreviewHost {
    fn capabilities(&self) -> HostCapabilities {
        // The preview always reports element-level observation.
        WebPlatform::detect_capabilities(true)
    }

    fn render(&mut self, tree: &LoopTree) {
        log::debug!("preview rendered {} copies", tree.copy_count());
        self.tree = Some(tree.clone());
    }

    fn measure(&self) -> Option<SequenceMeasurement> {
        let tree = self.tree.as_ref()?;
        let sequence = tree.find_anchor(Anchor::ReferenceSequence)?;
        let gap = tree
            .root()
            .style
            .get(GAP_VAR)
            .and_then(|value| value.trim_end_matches("px").parse().ok())
            .unwrap_or(0.0);
        let cards = sequence.child_elements().map(|_| self.card_width);
        let main = sequence_extent_of(cards, gap);
        Some(SequenceMeasurement {
            container: Size::new(
                self.viewport.width,
                self.pinned_height.unwrap_or(self.viewport.height),
            ),
            sequence: Size::new(main, self.viewport.height),
            parent_height: None,
        })
    }

    fn image_status(&self, _image: ImageId) -> ImageStatus {
        ImageStatus::Complete
    }

    fn set_container_height(&mut self, height: Option<f32>) {
        self.pinned_height = height;
    }

    fn apply_transform(&mut self, transform: TrackTransform) {
        self.last_transform = Some(transform);
        self.transform_writes += 1;
    }

    fn set_will_change(&mut self, hint: Option<&str>) {
        log::trace!("will-change: {:?}", hint);
    }

    fn observe_resize(&mut self, targets: &[ResizeTarget]) {
        log::trace!("observing {:?}", targets);
        self.observing = true;
    }

    fn listen_window_resize(&mut self) {
        self.observing = true;
    }

    fn detach_resize(&mut self) {
        self.observing = false;
    }
}
