//! Command handlers.
//!
//! Handlers are thin wrappers: they call into `apphome-core` and format the
//! result for the terminal.

pub mod migrate;
pub mod params;
pub mod paths;
