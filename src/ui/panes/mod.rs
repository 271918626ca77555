//! TUI pane rendering modules
//!
//! Each pane module exports a stateless `render_*` function that draws one
//! area of the screen from the interpreter's current state.
//!
//! # Pane Modules
//!
//! - [`source`]: Source code with syntax highlighting and the next statement marked
//! - [`scopes`]: Live variable bindings, innermost scope first
//! - [`terminal`]: Output captured from `printf` and `putchar`
//! - [`status`]: Status bar with keybindings and execution state

pub mod scopes;
pub mod source;
pub mod status;
pub mod terminal;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub use scopes::render_scopes_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;

/// Border style shared by every pane
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
