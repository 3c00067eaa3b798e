//! Waits for the reference copy's images before measuring it.

use logoloop_core::collections::map::HashSet;

/// Identifies one image inside the reference copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// Load state of an image at the moment the gate is armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    Complete,
    Pending,
}

/// Terminal image events. Both settle the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageEvent {
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Nothing to wait for; measure now.
    Ready,
    /// This many images are still loading.
    Waiting(usize),
}

/// Counts down the images of the reference copy and opens once all of them
/// have either loaded or failed. A failed image must not stall the loop.
#[derive(Debug, Default)]
pub struct ImageReadyGate {
    pending: HashSet<ImageId>,
    armed: bool,
    opened: bool,
}

impl ImageReadyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts waiting on `images`, discarding any previous wait.
    pub fn arm<I>(&mut self, images: I) -> GateOutcome
    where
        I: IntoIterator<Item = (ImageId, ImageStatus)>,
    {
        self.pending = images
            .into_iter()
            .filter(|(_, status)| *status == ImageStatus::Pending)
            .map(|(id, _)| id)
            .collect();
        self.armed = true;
        self.opened = self.pending.is_empty();
        if self.opened {
            GateOutcome::Ready
        } else {
            GateOutcome::Waiting(self.pending.len())
        }
    }

    /// Records a terminal event. Returns `true` exactly once: when the last
    /// pending image settles.
    pub fn settle(&mut self, id: ImageId, event: ImageEvent) -> bool {
        if !self.armed || self.opened {
            return false;
        }
        if !self.pending.remove(&id) {
            return false;
        }
        if event == ImageEvent::Failed {
            log::debug!("image {:?} failed to load; counting it as settled", id);
        }
        if self.pending.is_empty() {
            self.opened = true;
            return true;
        }
        false
    }

    pub fn disarm(&mut self) {
        self.pending.clear();
        self.armed = false;
        self.opened = false;
    }

    pub fn is_open(&self) -> bool {
        self.armed && self.opened
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_images_is_ready() {
        let mut gate = ImageReadyGate::new();
        assert_eq!(gate.arm(Vec::new()), GateOutcome::Ready);
        assert!(gate.is_open());
    }

    #[test]
    fn test_complete_images_do_not_block() {
        let mut gate = ImageReadyGate::new();
        let outcome = gate.arm([
            (ImageId(0), ImageStatus::Complete),
            (ImageId(1), ImageStatus::Complete),
        ]);
        assert_eq!(outcome, GateOutcome::Ready);
    }

    #[test]
    fn test_opens_once_after_last_settlement() {
        let mut gate = ImageReadyGate::new();
        let outcome = gate.arm([
            (ImageId(0), ImageStatus::Pending),
            (ImageId(1), ImageStatus::Complete),
            (ImageId(2), ImageStatus::Pending),
        ]);
        assert_eq!(outcome, GateOutcome::Waiting(2));

        assert!(!gate.settle(ImageId(0), ImageEvent::Loaded));
        // Duplicate and unknown events are ignored.
        assert!(!gate.settle(ImageId(0), ImageEvent::Loaded));
        assert!(!gate.settle(ImageId(1), ImageEvent::Loaded));
        assert!(gate.settle(ImageId(2), ImageEvent::Failed));
        assert!(!gate.settle(ImageId(2), ImageEvent::Loaded));
        assert!(gate.is_open());
    }

    #[test]
    fn test_disarmed_gate_ignores_events() {
        let mut gate = ImageReadyGate::new();
        gate.arm([(ImageId(0), ImageStatus::Pending)]);
        gate.disarm();
        assert!(!gate.settle(ImageId(0), ImageEvent::Loaded));
        assert!(!gate.is_open());
    }
}
