//! Headless match simulation
//!
//! The plugin that installs the match core, a builder for headless apps, and
//! deterministic frame stepping for tests and the scenario runner.

mod app_builder;
mod plugin;
mod step;

pub use app_builder::HeadlessAppBuilder;
pub use plugin::{MatchPlugin, MatchSet};
pub use step::{advance_frame, advance_frames, advance_seconds};
