//! Testing utilities and harness for Logoloop.

pub mod fake_host;
pub mod test_rule;

pub use fake_host::*;
pub use test_rule::*;
