//! Continuous loop track.
//!
//! A loop renders several copies of one item sequence side by side inside a
//! single track and translates the track every frame. When the offset passes
//! one full sequence it wraps back, and because every copy is identical the
//! wrap is invisible.
//!
//! # Architecture
//!
//! - [`LoopConfig`] - speed, direction, hover behavior and layout options
//! - [`SequenceGeometry`] - measured sequence extent and copy count
//!   ([`resolve_copy_count`] holds the sizing rule)
//! - [`MotionIntegrator`] - smoothed velocity and wrapped offset per frame
//! - [`ImageReadyGate`] - holds geometry back until reference images settle
//! - [`ResizeStrategy`] - resize observation, with the window fallback
//! - [`LoopState`] - shared handle tying the pieces together for one instance
//!
//! # Example
//!
//! ```rust,ignore
//! let config = LoopConfig::new().speed(80.0).gap(48.0);
//! let state = LoopState::new(&config);
//! state.apply_measurement(&measurement);
//! let outcome = state.step(clock.now());
//! if let Some(offset) = outcome.write {
//!     host.apply_transform(offset);
//! }
//! ```

mod config;
mod geometry;
mod image_gate;
mod motion;
mod observation;
mod state;

pub use config::*;
pub use geometry::*;
pub use image_gate::*;
pub use motion::*;
pub use observation::*;
pub use state::*;
