//! Mock filesystem implementations for testing.
//!
//! Provides [`MockFs`], the [`SharedFs`] swappable handle, and canned
//! kernel-interface scenarios so readers and drivers can be tested on
//! any platform.

mod filesystem;
mod scenarios;

pub use filesystem::{MockFs, SharedFs};
