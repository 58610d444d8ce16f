//! Window/workspace management core for the desktop shell.

pub mod apps;
pub mod bus;
pub mod model;
pub mod reducer;
pub mod registry;
pub mod session;
pub mod shell;
pub mod views;
pub mod window_manager;

pub use bus::{EventBus, ShellEvent, Subscription, Topic};
pub use model::*;
pub use reducer::{reduce_shell, RuntimeEffect, ShellAction};
pub use registry::AppRegistry;
pub use session::SessionSettings;
pub use shell::{DesktopShell, FolderCreationResult, FolderCreationStatus, Overlay};
pub use views::{StateSnapshot, WindowSummary};
