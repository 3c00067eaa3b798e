//! Core runtime pieces for Logoloop.
//!
//! Everything here is single-threaded and owned per instance: a mounted loop
//! holds its own [`FrameScheduler`], [`Ticker`] and [`FrameDebouncer`], so two
//! loops on the same page never share timing state.

pub mod collections;
mod frame;
mod scheduler;
mod ticker;

pub use frame::*;
pub use scheduler::*;
pub use ticker::*;
