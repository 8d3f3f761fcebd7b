//! User interface module - terminal output.
//!
//! - `formatter` - Rendering of reports, warnings and errors

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_available_projects, display_changelog, display_error, display_release,
    display_skipped, display_status, display_success, display_warning, render_release,
};
