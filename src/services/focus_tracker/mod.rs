//! FocusTracker service: responsibility and boundaries
//!
//! This module and its submodules answer exactly one question: is the focused
//! window owned by a process whose command line matches the target pattern.
//! They MUST NOT touch shortcut values; all blocking and restoring is done by
//! ShortcutController, which only consumes the boolean answer.

mod focus_tracker;
mod pgrep;
mod simulated;
mod r#trait;
mod xdotool;

pub use self::r#trait::{create_focus_tracker, FocusTrackerTrait};
