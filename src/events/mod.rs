pub mod focus;

pub use focus::{FocusEvent, FocusTransition};
