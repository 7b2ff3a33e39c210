//! Application state modules
//!
//! This module contains grouped state structs owned by VisageApp. Each state
//! struct owns its related fields; poll and submit methods communicate results
//! back through events instead of mutating app-level state.

mod avatar;
mod form;
mod ui;

pub use avatar::AvatarState;
pub use form::FormState;
pub use ui::UiState;

/// Events that state methods can return.
/// These communicate results back to VisageApp without direct mutation.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
