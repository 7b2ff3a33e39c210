//! UI modules for Visage
//!
//! This module contains the rendering code for the profile view and the
//! dialogs layered on top of it.

mod components;
mod cropper;
mod profile_view;
pub mod theme;

pub use components::{render_about_dialog, render_settings_dialog};
pub use cropper::{render_cropper, CropperState};
pub use profile_view::render_profile_view;
