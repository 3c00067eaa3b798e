//! Geometry, motion and configuration for the continuous logo loop.
//!
//! Nothing in this crate touches a host environment. Measurements come in as
//! plain values, and the results (copy counts, offsets, transform writes) go
//! back out the same way, so every rule here is testable without a DOM.

pub mod error;
pub mod loop_track;
pub mod pointer;

pub use error::ConfigError;
pub use loop_track::*;
pub use pointer::*;
