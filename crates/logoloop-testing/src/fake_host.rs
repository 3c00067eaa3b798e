//! In-memory [`LoopHost`] with scripted sizes and image states.

use std::cell::RefCell;
use std::rc::Rc;

use logoloop_core::collections::map::HashMap;
use logoloop_foundation::{
    sequence_extent_of, HostCapabilities, ImageId, ImageStatus, ResizeTarget,
    SequenceMeasurement, Size,
};
use logoloop_ui::style::{GAP_VAR, ITEM_HEIGHT_VAR};
use logoloop_ui::{Anchor, Element, LoopHost, LoopTree, TrackTransform};

/// Resize subscription the host currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResizeSubscription {
    None,
    Observing(Vec<ResizeTarget>),
    Window,
}

#[derive(Debug)]
struct FakeHostState {
    capabilities: HostCapabilities,
    container: Size,
    parent_height: Option<f32>,
    pinned_height: Option<f32>,
    item_extent: f32,
    item_extents: Vec<f32>,
    default_image_status: ImageStatus,
    image_statuses: HashMap<ImageId, ImageStatus>,
    tree: Option<LoopTree>,
    renders: usize,
    transforms: Vec<TrackTransform>,
    will_change: Option<String>,
    subscription: ResizeSubscription,
}

/// A scripted host. Clones share state, so a test keeps one clone while the
/// mounted loop owns another.
///
/// The reference copy measures as the sum of its item extents plus one gap
/// per item, the gap read from the rendered `--logoloop-gap` variable. Items
/// whose image has not loaded contribute nothing, like unsized images.
#[derive(Clone, Debug)]
pub struct FakeHost {
    state: Rc<RefCell<FakeHostState>>,
}

impl FakeHost {
    pub fn new(container_width: f32, container_height: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeHostState {
                capabilities: HostCapabilities::default(),
                container: Size::new(container_width, container_height),
                parent_height: None,
                pinned_height: None,
                item_extent: 100.0,
                item_extents: Vec::new(),
                default_image_status: ImageStatus::Complete,
                image_statuses: HashMap::default(),
                tree: None,
                renders: 0,
                transforms: Vec::new(),
                will_change: None,
                subscription: ResizeSubscription::None,
            })),
        }
    }

    /// Main-axis extent of every item without an explicit extent.
    pub fn with_item_extent(self, extent: f32) -> Self {
        self.state.borrow_mut().item_extent = extent;
        self
    }

    /// Main-axis extents by item index.
    pub fn with_item_extents(self, extents: impl Into<Vec<f32>>) -> Self {
        self.state.borrow_mut().item_extents = extents.into();
        self
    }

    pub fn with_parent_height(self, height: f32) -> Self {
        self.state.borrow_mut().parent_height = Some(height);
        self
    }

    pub fn without_resize_observer(self) -> Self {
        self.state.borrow_mut().capabilities.resize_observer = false;
        self
    }

    /// Images start out loading instead of complete.
    pub fn with_pending_images(self) -> Self {
        self.state.borrow_mut().default_image_status = ImageStatus::Pending;
        self
    }

    pub fn set_container(&self, width: f32, height: f32) {
        self.state.borrow_mut().container = Size::new(width, height);
    }

    pub fn set_parent_height(&self, height: Option<f32>) {
        self.state.borrow_mut().parent_height = height;
    }

    pub fn set_image_status(&self, image: ImageId, status: ImageStatus) {
        self.state.borrow_mut().image_statuses.insert(image, status);
    }

    pub fn tree(&self) -> Option<LoopTree> {
        self.state.borrow().tree.clone()
    }

    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    pub fn transforms(&self) -> Vec<TrackTransform> {
        self.state.borrow().transforms.clone()
    }

    pub fn transform_count(&self) -> usize {
        self.state.borrow().transforms.len()
    }

    pub fn last_transform(&self) -> Option<TrackTransform> {
        self.state.borrow().transforms.last().copied()
    }

    pub fn pinned_height(&self) -> Option<f32> {
        self.state.borrow().pinned_height
    }

    pub fn will_change(&self) -> Option<String> {
        self.state.borrow().will_change.clone()
    }

    pub fn subscription(&self) -> ResizeSubscription {
        self.state.borrow().subscription.clone()
    }
}

fn px_var(root: &Element, name: &str) -> f32 {
    root.style
        .get(name)
        .and_then(|value| value.trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

impl FakeHostState {
    fn status(&self, image: ImageId) -> ImageStatus {
        self.image_statuses
            .get(&image)
            .copied()
            .unwrap_or(self.default_image_status)
    }

    fn item_extent(&self, index: usize) -> f32 {
        self.item_extents
            .get(index)
            .copied()
            .unwrap_or(self.item_extent)
    }
}

impl LoopHost for FakeHost {
    fn capabilities(&self) -> HostCapabilities {
        self.state.borrow().capabilities
    }

    fn render(&mut self, tree: &LoopTree) {
        let mut state = self.state.borrow_mut();
        state.tree = Some(tree.clone());
        state.renders += 1;
    }

    fn measure(&self) -> Option<SequenceMeasurement> {
        let state = self.state.borrow();
        let tree = state.tree.as_ref()?;
        let root = tree.root();
        let sequence = tree.find_anchor(Anchor::ReferenceSequence)?;
        let gap = px_var(root, GAP_VAR);
        let cross = px_var(root, ITEM_HEIGHT_VAR);
        let vertical = root.has_class("logoloop--vertical");

        let extents = sequence.child_elements().enumerate().filter_map(|(index, item)| {
            let loaded = item
                .descendants()
                .into_iter()
                .filter_map(|element| element.image)
                .all(|image| state.status(image) == ImageStatus::Complete);
            loaded.then(|| state.item_extent(index))
        });
        let main = sequence_extent_of(extents, gap);
        let cross = if main > 0.0 { cross } else { 0.0 };

        let container_height = state.pinned_height.unwrap_or(state.container.height);
        Some(SequenceMeasurement {
            container: Size::new(state.container.width, container_height),
            sequence: if vertical {
                Size::new(cross, main)
            } else {
                Size::new(main, cross)
            },
            parent_height: state.parent_height,
        })
    }

    fn image_status(&self, image: ImageId) -> ImageStatus {
        self.state.borrow().status(image)
    }

    fn set_container_height(&mut self, height: Option<f32>) {
        self.state.borrow_mut().pinned_height = height;
    }

    fn apply_transform(&mut self, transform: TrackTransform) {
        self.state.borrow_mut().transforms.push(transform);
    }

    fn set_will_change(&mut self, hint: Option<&str>) {
        self.state.borrow_mut().will_change = hint.map(str::to_string);
    }

    fn observe_resize(&mut self, targets: &[ResizeTarget]) {
        self.state.borrow_mut().subscription = ResizeSubscription::Observing(targets.to_vec());
    }

    fn listen_window_resize(&mut self) {
        self.state.borrow_mut().subscription = ResizeSubscription::Window;
    }

    fn detach_resize(&mut self) {
        self.state.borrow_mut().subscription = ResizeSubscription::None;
    }
}
