//! Per-instance frame callback queue.
//!
//! [`FrameScheduler`] plays the role of the host's `requestAnimationFrame`
//! queue, but is owned by whoever mounts a loop instead of living in a
//! module-level global. The host (a browser binding, a test rule, a headless
//! runner) calls [`FrameScheduler::dispatch_frame`] once per frame.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::collections::map::HashSet;
use crate::frame::FrameTime;

/// Handle returned by [`FrameScheduler::request_frame`], used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameCallbackId(u64);

type FrameCallback = Box<dyn FnOnce(FrameTime)>;

struct SchedulerInner {
    next_id: u64,
    /// Callbacks for the next dispatched frame, in request order.
    queue: SmallVec<[(FrameCallbackId, FrameCallback); 4]>,
    /// Ids of the batch currently being dispatched that have not run yet.
    in_flight: HashSet<FrameCallbackId>,
    frames_dispatched: u64,
}

/// Single-threaded frame callback queue.
///
/// Semantics match the browser's animation-frame queue:
/// - callbacks requested before a dispatch run in that dispatch, FIFO;
/// - callbacks requested while a dispatch is running wait for the next frame;
/// - a callback cancelled before it runs never runs, even mid-dispatch.
///
/// Clones share the same queue.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

/// Non-owning scheduler handle held by pending callbacks, so a queued
/// callback never keeps its own scheduler alive.
#[derive(Clone)]
pub struct WeakFrameScheduler {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl WeakFrameScheduler {
    pub fn upgrade(&self) -> Option<FrameScheduler> {
        self.inner.upgrade().map(|inner| FrameScheduler { inner })
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                next_id: 1,
                queue: SmallVec::new(),
                in_flight: HashSet::default(),
                frames_dispatched: 0,
            })),
        }
    }

    pub fn downgrade(&self) -> WeakFrameScheduler {
        WeakFrameScheduler {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Queues `callback` for the next dispatched frame.
    pub fn request_frame<F>(&self, callback: F) -> FrameCallbackId
    where
        F: FnOnce(FrameTime) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = FrameCallbackId(inner.next_id);
        inner.next_id += 1;
        inner.queue.push((id, Box::new(callback)));
        id
    }

    /// Cancels a pending callback. Returns `false` if it already ran or was
    /// never scheduled here.
    pub fn cancel(&self, id: FrameCallbackId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(pos) = inner.queue.iter().position(|(queued, _)| *queued == id) {
            // Dropped outside the borrow below.
            let (_, callback) = inner.queue.remove(pos);
            drop(inner);
            drop(callback);
            return true;
        }
        inner.in_flight.remove(&id)
    }

    /// Runs every callback queued before this call. Returns how many ran.
    pub fn dispatch_frame(&self, timestamp: FrameTime) -> usize {
        let batch = {
            let mut inner = self.inner.borrow_mut();
            let batch = std::mem::take(&mut inner.queue);
            inner.in_flight = batch.iter().map(|(id, _)| *id).collect();
            inner.frames_dispatched += 1;
            batch
        };

        let mut ran = 0;
        for (id, callback) in batch {
            let still_wanted = self.inner.borrow_mut().in_flight.remove(&id);
            if !still_wanted {
                log::trace!("frame callback {:?} cancelled mid-dispatch", id);
                continue;
            }
            callback(timestamp);
            ran += 1;
        }

        self.inner.borrow_mut().in_flight.clear();
        ran
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().queue.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn frames_dispatched(&self) -> u64 {
        self.inner.borrow().frames_dispatched
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("pending", &inner.queue.len())
            .field("frames_dispatched", &inner.frames_dispatched)
            .finish()
    }
}
