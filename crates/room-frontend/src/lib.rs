//! Room Editor Frontend
//!
//! A headless console shell around [`room_core::Editor`]: commands are parsed
//! into actions, dispatched against shared state, and the scene, form, picker
//! and error modal are mirrored by an in-memory host.

pub mod actions;
pub mod command;
pub mod config;
pub mod host;
pub mod state;

pub use actions::{ActionContext, dispatch};
pub use command::{CommandError, parse_command};
pub use host::ShellHost;
pub use state::{AppAction, AppState, SharedAppState, create_shared_state};
