//! A loop mounted into a host.
//!
//! [`MountedLoop`] owns everything that lives for one mount: the widget, the
//! host, the shared [`LoopState`], a [`Ticker`] driving motion, a
//! [`FrameDebouncer`] collapsing geometry requests and the image gate.
//!
//! # Frame ordering
//!
//! Geometry passes and motion steps share the instance's
//! [`FrameScheduler`]. A geometry pass applies its result synchronously
//! inside its callback, so the first motion step after it already sees the
//! new sequence extent.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use logoloop_core::{FrameDebouncer, FrameScheduler, FrameTime, Ticker};
use logoloop_foundation::{
    ConfigError, GateOutcome, ImageEvent, ImageId, ImageReadyGate, LoopConfig, LoopInvalidation,
    LoopState, MotionIntegrator, PointerEvent, PointerEventKind, PointerTarget, ResizeStrategy,
};

use crate::host::{LoopHost, TrackTransform};
use crate::item::LoopItem;
use crate::node::LoopTree;
use crate::widgets::LogoLoop;

const WILL_CHANGE_TRANSFORM: &str = "transform";

struct MountedInner<H: LoopHost> {
    widget: RefCell<LogoLoop>,
    host: RefCell<H>,
    state: LoopState,
    ticker: Ticker,
    debouncer: FrameDebouncer,
    gate: RefCell<ImageReadyGate>,
    strategy: Cell<ResizeStrategy>,
    mounted: Cell<bool>,
    invalidate_callback: Cell<Option<u64>>,
}

/// Handle to a mounted loop. Dropping it unmounts.
pub struct MountedLoop<H: LoopHost + 'static> {
    inner: Rc<MountedInner<H>>,
}

impl<H: LoopHost + 'static> MountedLoop<H> {
    /// Mounts `widget` into `host`, driving frames from `scheduler`.
    pub fn mount(widget: LogoLoop, host: H, scheduler: FrameScheduler) -> Self {
        Self::mount_with_integrator(widget, host, scheduler, MotionIntegrator::new())
    }

    /// Like [`mount`](Self::mount) with a tuned motion integrator.
    pub fn mount_with_integrator(
        widget: LogoLoop,
        host: H,
        scheduler: FrameScheduler,
        integrator: MotionIntegrator,
    ) -> Self {
        let state = LoopState::with_integrator(widget.config(), integrator);
        let strategy = ResizeStrategy::select(host.capabilities());
        let inner = Rc::new(MountedInner {
            widget: RefCell::new(widget),
            host: RefCell::new(host),
            state,
            ticker: Ticker::new(scheduler.clone()),
            debouncer: FrameDebouncer::new(scheduler),
            gate: RefCell::new(ImageReadyGate::new()),
            strategy: Cell::new(strategy),
            mounted: Cell::new(true),
            invalidate_callback: Cell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let callback_id = inner.state.add_invalidate_callback(Rc::new(move |reason| {
            if let Some(inner) = weak.upgrade() {
                let LoopInvalidation::CopyCount(count) = reason;
                log::trace!("re-rendering loop for {} copies", count);
                render(&inner);
            }
        }));
        inner.invalidate_callback.set(Some(callback_id));

        render(&inner);
        {
            let mut host = inner.host.borrow_mut();
            host.set_will_change(Some(WILL_CHANGE_TRANSFORM));
            match strategy {
                ResizeStrategy::Observe => host.observe_resize(strategy.targets()),
                ResizeStrategy::WindowFallback => host.listen_window_resize(),
            }
        }
        request_geometry(&inner);
        arm_images(&inner);
        start_motion(&inner);

        log::debug!(
            "mounted logo loop: {} items, {:?}",
            inner.widget.borrow().items().len(),
            inner.widget.borrow().config().direction
        );
        Self { inner }
    }

    pub fn state(&self) -> LoopState {
        self.inner.state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn resize_strategy(&self) -> ResizeStrategy {
        self.inner.strategy.get()
    }

    pub fn is_running(&self) -> bool {
        self.inner.ticker.is_running()
    }

    /// The tree currently rendered into the host.
    pub fn tree(&self) -> Rc<LoopTree> {
        self.inner
            .widget
            .borrow()
            .compose(self.inner.state.copy_count())
    }

    pub fn config(&self) -> LoopConfig {
        self.inner.widget.borrow().config().clone()
    }

    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.host.borrow())
    }

    pub fn with_host_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.host.borrow_mut())
    }

    /// Reports a size change of the container or the reference copy, or a
    /// window resize under the fallback strategy. Returns `false` when the
    /// request was absorbed by an already pending geometry pass.
    pub fn notify_resize(&self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        request_geometry(&self.inner)
    }

    /// Reports that an image of the reference copy finished loading or
    /// failed. Both settle the image.
    pub fn notify_image(&self, image: ImageId, event: ImageEvent) {
        if !self.is_mounted() {
            return;
        }
        let opened = self.inner.gate.borrow_mut().settle(image, event);
        if opened {
            log::debug!("reference images settled, measuring sequence");
            request_geometry(&self.inner);
        }
    }

    pub fn pointer_enter(&self) -> bool {
        self.is_mounted() && self.inner.state.set_hovered(true)
    }

    pub fn pointer_leave(&self) -> bool {
        self.is_mounted() && self.inner.state.set_hovered(false)
    }

    /// Routes a platform pointer event. Only enter and leave on the track
    /// change hover; crossing between items does not.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        match (event.kind, event.target) {
            (PointerEventKind::Enter, PointerTarget::Track) => self.pointer_enter(),
            (PointerEventKind::Leave, PointerTarget::Track) => self.pointer_leave(),
            (PointerEventKind::Cancel, _) => self.pointer_leave(),
            _ => false,
        }
    }

    /// Adopts a new configuration. Layout-affecting changes reset geometry
    /// and wait for the reference images again.
    pub fn set_config(&self, config: LoopConfig) -> Result<(), ConfigError> {
        let inner = &self.inner;
        let previous = inner.widget.borrow_mut().set_config(config)?;
        let current = inner.widget.borrow().config().clone();
        let layout_reset = inner.state.apply_config(&previous, &current);

        if !self.is_mounted() {
            return Ok(());
        }
        if previous.orientation() != current.orientation() && !current.orientation().is_vertical()
        {
            inner.host.borrow_mut().set_container_height(None);
        }
        render(inner);
        if layout_reset {
            log::debug!("layout options changed, re-measuring");
            request_geometry(inner);
            arm_images(inner);
        }
        Ok(())
    }

    /// Replaces the item sequence.
    pub fn set_items(&self, items: impl Into<Rc<[LoopItem]>>) {
        let inner = &self.inner;
        inner.widget.borrow_mut().set_items(items);
        inner.state.invalidate_geometry();
        if !self.is_mounted() {
            return;
        }
        render(inner);
        request_geometry(inner);
        arm_images(inner);
    }

    /// Stops motion, cancels pending frames and detaches listeners. No
    /// callback of this loop runs afterwards. Idempotent.
    pub fn unmount(&self) {
        let inner = &self.inner;
        if !inner.mounted.replace(false) {
            return;
        }
        inner.ticker.stop();
        inner.debouncer.cancel();
        inner.gate.borrow_mut().disarm();
        inner.state.reset_timing();
        if let Some(id) = inner.invalidate_callback.take() {
            inner.state.remove_invalidate_callback(id);
        }
        inner.host.borrow_mut().detach_resize();
        log::debug!("unmounted logo loop after {} frames", inner.ticker.ticks());
    }
}

impl<H: LoopHost + 'static> Drop for MountedLoop<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<H: LoopHost + 'static> std::fmt::Debug for MountedLoop<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedLoop")
            .field("mounted", &self.inner.mounted.get())
            .field("state", &self.inner.state)
            .field("ticker", &self.inner.ticker)
            .finish()
    }
}

fn render<H: LoopHost>(inner: &MountedInner<H>) {
    let tree = inner.widget.borrow().compose(inner.state.copy_count());
    inner.host.borrow_mut().render(&tree);
}

fn request_geometry<H: LoopHost + 'static>(inner: &Rc<MountedInner<H>>) -> bool {
    let weak: Weak<MountedInner<H>> = Rc::downgrade(inner);
    inner.debouncer.request(move |_| {
        if let Some(inner) = weak.upgrade() {
            run_geometry_pass(&inner);
        }
    })
}

fn run_geometry_pass<H: LoopHost>(inner: &MountedInner<H>) {
    if !inner.mounted.get() {
        return;
    }
    let Some(measurement) = inner.host.borrow().measure() else {
        log::trace!("loop anchors not attached, skipping geometry pass");
        return;
    };
    let outcome = inner.state.apply_measurement(&measurement);

    let mut host = inner.host.borrow_mut();
    if let Some(height) = outcome.update.container_height {
        host.set_container_height(Some(height));
    }
    if let Some(offset) = outcome.transform {
        host.apply_transform(TrackTransform::new(inner.state.orientation(), offset));
    }
}

fn arm_images<H: LoopHost + 'static>(inner: &Rc<MountedInner<H>>) {
    let tree = inner.widget.borrow().compose(inner.state.copy_count());
    let statuses: Vec<_> = {
        let host = inner.host.borrow();
        tree.reference_images()
            .into_iter()
            .map(|image| (image, host.image_status(image)))
            .collect()
    };
    let outcome = inner.gate.borrow_mut().arm(statuses);
    match outcome {
        GateOutcome::Ready => {
            request_geometry(inner);
        }
        GateOutcome::Waiting(count) => {
            log::debug!("waiting for {} reference images before measuring", count);
        }
    }
}

fn start_motion<H: LoopHost + 'static>(inner: &Rc<MountedInner<H>>) {
    let weak = Rc::downgrade(inner);
    inner.ticker.start(move |timestamp: FrameTime| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let outcome = inner.state.step(timestamp);
        if let Some(offset) = outcome.write {
            inner
                .host
                .borrow_mut()
                .apply_transform(TrackTransform::new(inner.state.orientation(), offset));
        }
    });
}
