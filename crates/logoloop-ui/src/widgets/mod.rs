//! Widget implementations.

mod logo_loop;

pub use logo_loop::*;
