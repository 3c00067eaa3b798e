//! How a mounted loop learns that it needs a new geometry pass.

/// Features of the host environment relevant to a loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Element-level resize observation is available.
    pub resize_observer: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            resize_observer: true,
        }
    }
}

/// Elements whose size changes trigger a geometry pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeTarget {
    Container,
    ReferenceSequence,
}

pub const OBSERVED_TARGETS: [ResizeTarget; 2] =
    [ResizeTarget::Container, ResizeTarget::ReferenceSequence];

/// Source of resize notifications for one mounted loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeStrategy {
    /// Observe [`OBSERVED_TARGETS`] directly.
    Observe,
    /// Listen for the host window's resize signal instead.
    WindowFallback,
}

impl ResizeStrategy {
    pub fn select(capabilities: HostCapabilities) -> Self {
        if capabilities.resize_observer {
            ResizeStrategy::Observe
        } else {
            log::debug!("no resize observer available, falling back to window resize events");
            ResizeStrategy::WindowFallback
        }
    }

    /// Elements to observe; empty for the window fallback.
    pub fn targets(self) -> &'static [ResizeTarget] {
        match self {
            ResizeStrategy::Observe => &OBSERVED_TARGETS,
            ResizeStrategy::WindowFallback => &[],
        }
    }
}
