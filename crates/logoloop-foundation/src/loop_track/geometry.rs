//! Sequence sizing and copy-count resolution.

/// Minimum number of rendered copies; two are needed for a seamless wrap
/// even when one sequence is wider than the viewport.
pub const MIN_COPIES: usize = 2;

/// Extra copies beyond the viewport to absorb sub-pixel timing slack at the
/// wrap point.
pub const COPY_HEADROOM: usize = 2;

/// Copy counts above this are resolved but logged as suspicious; they
/// usually mean the sequence was measured before its items were laid out.
pub const COPY_WARN_THRESHOLD: usize = 256;

/// Scroll axis of a loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }

    /// Extent of `size` along this axis.
    pub fn main_axis(self, size: Size) -> f32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Number of copies needed to keep a viewport of `viewport_extent` covered.
///
/// Returns `None` for a zero, negative or non-finite sequence extent: the
/// sequence has not been laid out yet and there is nothing to resolve.
pub fn resolve_copy_count(viewport_extent: f32, sequence_extent: f32) -> Option<usize> {
    if !sequence_extent.is_finite() || sequence_extent <= 0.0 {
        return None;
    }
    let viewport = if viewport_extent.is_finite() {
        viewport_extent.max(0.0)
    } else {
        0.0
    };
    let needed = (viewport / sequence_extent).ceil() as usize + COPY_HEADROOM;
    if needed > COPY_WARN_THRESHOLD {
        log::warn!(
            "{}px sequence needs {} copies to cover {}px",
            sequence_extent,
            needed,
            viewport
        );
    }
    Some(needed.max(MIN_COPIES))
}

/// Extent of one sequence whose items each carry one trailing gap.
///
/// Five 100px items with a 20px gap measure 600px.
pub fn sequence_extent_of<I>(item_extents: I, gap: f32) -> f32
where
    I: IntoIterator<Item = f32>,
{
    item_extents.into_iter().map(|extent| extent + gap).sum()
}

/// Raw host measurements feeding one geometry pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SequenceMeasurement {
    /// Client size of the loop container.
    pub container: Size,
    /// Bounding box of the reference copy.
    pub sequence: Size,
    /// Client height of the container's layout parent, if it has one.
    pub parent_height: Option<f32>,
}

/// Measured sequence extent and the copy count derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequenceGeometry {
    sequence_extent: f32,
    copy_count: usize,
}

impl Default for SequenceGeometry {
    fn default() -> Self {
        Self {
            sequence_extent: 0.0,
            copy_count: MIN_COPIES,
        }
    }
}

/// Result of [`SequenceGeometry::recompute`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryUpdate {
    pub geometry: SequenceGeometry,
    /// Height the container must be pinned to (vertical loops only).
    pub container_height: Option<f32>,
    /// Whether `geometry` differs from the geometry it was computed from.
    pub changed: bool,
}

impl SequenceGeometry {
    pub fn new(sequence_extent: f32, copy_count: usize) -> Self {
        Self {
            sequence_extent,
            copy_count: copy_count.max(MIN_COPIES),
        }
    }

    pub fn sequence_extent(&self) -> f32 {
        self.sequence_extent
    }

    pub fn copy_count(&self) -> usize {
        self.copy_count
    }

    pub fn is_measured(&self) -> bool {
        self.sequence_extent > 0.0
    }

    /// Forgets the measured extent but keeps the rendered copy count, so the
    /// track stays filled until the next measurement lands.
    pub fn invalidated(&self) -> Self {
        Self {
            sequence_extent: 0.0,
            copy_count: self.copy_count,
        }
    }

    /// Derives new geometry from host measurements.
    ///
    /// A zero-extent sequence leaves the current geometry untouched.
    pub fn recompute(
        &self,
        orientation: Orientation,
        measurement: &SequenceMeasurement,
    ) -> GeometryUpdate {
        let sequence_extent = orientation.main_axis(measurement.sequence).round();

        let (container_height, viewport) = match orientation {
            Orientation::Horizontal => (None, measurement.container.width),
            Orientation::Vertical => {
                // Vertical flows have no intrinsic height; borrow the parent's.
                let pinned = measurement
                    .parent_height
                    .filter(|height| *height > 0.0)
                    .map(f32::ceil);
                let container = pinned.unwrap_or(measurement.container.height);
                let viewport = [
                    container,
                    measurement.parent_height.unwrap_or(0.0),
                    sequence_extent,
                ]
                .into_iter()
                .find(|extent| *extent > 0.0)
                .unwrap_or(0.0);
                (pinned, viewport)
            }
        };

        let Some(copy_count) = resolve_copy_count(viewport, sequence_extent) else {
            log::trace!(
                "sequence not laid out yet ({:?} extent {}), keeping geometry",
                orientation,
                sequence_extent
            );
            return GeometryUpdate {
                geometry: *self,
                container_height,
                changed: false,
            };
        };

        let geometry = SequenceGeometry {
            sequence_extent,
            copy_count,
        };
        GeometryUpdate {
            geometry,
            container_height,
            changed: geometry != *self,
        }
    }
}
