//! The LogoLoop widget and its runtime.
//!
//! [`LogoLoop`] composes a configuration and an item sequence into a
//! [`LoopTree`]; [`MountedLoop`] keeps that tree alive inside a [`LoopHost`],
//! re-measuring on resize and image load and moving the track every frame.
//!
//! ```rust,ignore
//! let widget = LogoLoop::new(LoopConfig::new().speed(80.0), items)?;
//! let mounted = MountedLoop::mount(widget, host, scheduler.clone());
//! scheduler.dispatch_frame(clock.now());
//! ```

pub mod controller;
pub mod host;
pub mod item;
pub mod node;
pub mod semantics;
pub mod style;
pub mod widgets;

pub use controller::MountedLoop;
pub use host::{LoopHost, TrackTransform};
pub use item::*;
pub use node::*;
pub use semantics::*;
pub use widgets::*;

pub use logoloop_foundation::{
    ConfigError, CssLength, HoverBehavior, ImageEvent, ImageId, ImageStatus, LoopConfig,
    LoopDirection, Orientation,
};
