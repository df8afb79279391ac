//! Help and info rendering.

mod help;
pub mod style;

pub use help::{AppInfo, render_help, render_info};
pub use style::{color_choice, print_styled};
