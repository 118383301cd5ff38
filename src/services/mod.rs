pub mod backup_writer;
pub mod command_runner;
pub mod focus_tracker;
pub mod key_store;
pub mod shortcut_controller;
pub mod shortcut_state;

pub use backup_writer::BackupWriter;
pub use command_runner::{CommandRunner, DryRunCommandRunner, SystemCommandRunner};
pub use focus_tracker::create_focus_tracker;
pub use key_store::KeyStore;
pub use shortcut_controller::ShortcutController;
pub use shortcut_state::ShortcutState;
