use logoloop_core::{FrameClock, FrameScheduler, ManualFrameClock};
use logoloop_foundation::{
    ImageEvent, ImageId, ImageStatus, LoopState, PointerEventKind, PointerTarget,
};
use logoloop_platform_web::{HoverTracker, HoverTransition, Rect, WebPlatform};
use logoloop_ui::{
    semantics_tree, LogoLoop, MountedLoop, SemanticsNode, SemanticsRole,
};

use crate::fake_host::FakeHost;

/// Frame interval used by [`LoopTestRule::advance_frames`].
pub const FRAME_MS: f64 = 1000.0 / 60.0;

pub struct SemanticsMatcher {
    description: String,
    matcher: Box<dyn Fn(&SemanticsNode) -> bool>,
}

impl SemanticsMatcher {
    pub fn new(
        description: impl Into<String>,
        matcher: impl Fn(&SemanticsNode) -> bool + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            matcher: Box::new(matcher),
        }
    }

    pub fn matches(&self, node: &SemanticsNode) -> bool {
        (self.matcher)(node)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

pub fn has_text(text: impl Into<String>) -> SemanticsMatcher {
    let text = text.into();
    SemanticsMatcher::new(format!("has_text({:?})", text), move |node| {
        matches!(&node.role, SemanticsRole::Text { value } if value == &text)
    })
}

pub fn has_label(label: impl Into<String>) -> SemanticsMatcher {
    let label = label.into();
    SemanticsMatcher::new(format!("has_label({:?})", label), move |node| {
        node.label.as_deref() == Some(label.as_str())
    })
}

pub fn is_link_to(href: impl Into<String>) -> SemanticsMatcher {
    let href = href.into();
    SemanticsMatcher::new(format!("is_link_to({:?})", href), move |node| {
        matches!(&node.role, SemanticsRole::Link { href: target } if target == &href)
    })
}

pub fn is_list() -> SemanticsMatcher {
    SemanticsMatcher::new("is_list()", |node| node.role == SemanticsRole::List)
}

pub fn is_list_item() -> SemanticsMatcher {
    SemanticsMatcher::new("is_list_item()", |node| node.role == SemanticsRole::ListItem)
}

/// Drives one mounted loop with a manual clock.
///
/// Every instance owns its scheduler, so rules never interfere with each
/// other even when tests run in parallel threads.
pub struct LoopTestRule {
    clock: ManualFrameClock,
    scheduler: FrameScheduler,
    host: FakeHost,
    platform: WebPlatform,
    hover: HoverTracker,
    mounted: Option<MountedLoop<FakeHost>>,
}

impl LoopTestRule {
    pub fn new(host: FakeHost) -> Self {
        Self {
            clock: ManualFrameClock::new(),
            scheduler: FrameScheduler::new(),
            host,
            platform: WebPlatform::default(),
            hover: HoverTracker::new(),
            mounted: None,
        }
    }

    /// Mounts `widget`, replacing any loop mounted before, and runs the
    /// first frame.
    pub fn set_content(&mut self, widget: LogoLoop) -> &MountedLoop<FakeHost> {
        self.mounted = None;
        self.hover = HoverTracker::new();
        log::trace!(
            "test rule mounting {} items at {}ms",
            widget.items().len(),
            self.clock.now().as_millis()
        );
        self.mounted = Some(MountedLoop::mount(
            widget,
            self.host.clone(),
            self.scheduler.clone(),
        ));
        self.dispatch();
        self.mounted()
    }

    pub fn mounted(&self) -> &MountedLoop<FakeHost> {
        self.mounted
            .as_ref()
            .unwrap_or_else(|| panic!("no content set on LoopTestRule"))
    }

    pub fn state(&self) -> LoopState {
        self.mounted().state()
    }

    pub fn host(&self) -> &FakeHost {
        &self.host
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &ManualFrameClock {
        &self.clock
    }

    /// Runs the callbacks queued for the current clock time.
    pub fn dispatch(&mut self) -> usize {
        self.scheduler.dispatch_frame(self.clock.now())
    }

    pub fn advance_frame(&mut self, millis: f64) -> usize {
        self.clock.advance(millis);
        self.dispatch()
    }

    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_frame(FRAME_MS);
        }
    }

    /// Advances frames until `millis` of clock time have passed.
    pub fn advance_time(&mut self, millis: f64) {
        let frames = (millis / FRAME_MS).ceil() as usize;
        self.advance_frames(frames);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        log::trace!("test rule resizing container to {}x{}", width, height);
        self.host.set_container(width, height);
        self.mounted().notify_resize();
    }

    pub fn load_image(&mut self, image: ImageId) {
        log::trace!("test rule loaded image {:?}", image);
        self.host.set_image_status(image, ImageStatus::Complete);
        self.mounted().notify_image(image, ImageEvent::Loaded);
    }

    /// The image stays unsized but counts as settled.
    pub fn fail_image(&mut self, image: ImageId) {
        log::trace!("test rule failed image {:?}", image);
        self.mounted().notify_image(image, ImageEvent::Failed);
    }

    pub fn pointer_enter(&mut self) {
        self.pointer(PointerEventKind::Enter, PointerTarget::Track, 1.0, 1.0);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer(PointerEventKind::Leave, PointerTarget::Track, -1.0, -1.0);
    }

    /// Delivers a raw pointer event in device pixels through the web
    /// platform mapping.
    pub fn pointer(&mut self, kind: PointerEventKind, target: PointerTarget, x: f64, y: f64) {
        let event = self.platform.pointer_event(kind, target, x, y);
        match self.hover.on_event(&event) {
            Some(HoverTransition::Entered) => {
                self.mounted().pointer_enter();
            }
            Some(HoverTransition::Left) => {
                self.mounted().pointer_leave();
            }
            None => {}
        }
    }

    pub fn set_track_bounds(&mut self, bounds: Rect) {
        self.hover.set_track_bounds(bounds);
    }

    pub fn semantics(&self) -> Option<SemanticsNode> {
        let tree = self.host.tree()?;
        semantics_tree(tree.root())
    }

    pub fn find_node(&self, matcher: &SemanticsMatcher) -> Option<SemanticsNode> {
        self.semantics()?.find(&|node| matcher.matches(node)).cloned()
    }

    pub fn count_nodes(&self, matcher: &SemanticsMatcher) -> usize {
        self.semantics()
            .map(|root| root.count(&|node| matcher.matches(node)))
            .unwrap_or(0)
    }

    pub fn assert_exists(&self, matcher: SemanticsMatcher) {
        assert!(
            self.find_node(&matcher).is_some(),
            "No node found matching {}",
            matcher.description()
        );
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.as_ref() {
            mounted.unmount();
        }
    }
}
