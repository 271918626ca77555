//! Scope pane rendering
//!
//! Lists the bindings visible from `main`'s scope, innermost scope first,
//! ending with the globals.

use super::{border_style, clamp_scroll};
use crate::interpreter::Interpreter;
use crate::memory::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

fn value_style(value: &Value) -> Style {
    match value {
        Value::Str(_) | Value::Char(_) => Style::default().fg(DEFAULT_THEME.string),
        Value::Int(_) | Value::Float(_) => Style::default().fg(DEFAULT_THEME.number),
    }
}

/// Build the display lines for every scope in the visible chain
pub fn scope_lines(interpreter: &Interpreter) -> Vec<Line<'static>> {
    let scopes = interpreter.scopes();
    let chain = scopes.chain(interpreter.current_scope());
    let mut lines = Vec::new();

    for scope in chain {
        let title = if scope == scopes.root() {
            "globals".to_string()
        } else {
            format!("main (scope {})", scope.index())
        };
        lines.push(Line::from(Span::styled(
            title,
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD),
        )));

        let bindings = scopes.bindings(scope);
        if bindings.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (empty)",
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
        for (name, value) in bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<6} ", value.type_name()),
                    Style::default().fg(DEFAULT_THEME.type_name),
                ),
                Span::styled(name.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(value.to_string(), value_style(value)),
            ]));
        }
    }

    lines
}

/// Render the scope pane
pub fn render_scopes_pane(
    frame: &mut Frame,
    area: Rect,
    interpreter: &Interpreter,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Scopes ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused))
        .padding(Padding::new(1, 0, 0, 0));

    let lines = scope_lines(interpreter);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_lists_main_scope_then_globals() {
        let mut interpreter =
            Interpreter::from_source("int g = 7;\nint main() { int x = 2; return x; }").unwrap();
        interpreter.enable_stepping();
        interpreter.step().unwrap();

        let text: Vec<String> = scope_lines(&interpreter).iter().map(text_of).collect();
        assert_eq!(text[0], "main (scope 1)");
        assert_eq!(text[1], "  int    x = 2");
        assert_eq!(text[2], "globals");
        assert_eq!(text[3], "  int    g = 7");
    }
}
