//! Source code pane rendering with syntax highlighting
//!
//! Each line is run through the interpreter's own [`Lexer`], so highlighting
//! agrees with how the program is actually tokenized. Text the lexer skips
//! (comments, preprocessor lines) is shown in the comment color.

use super::border_style;
use crate::parser::lexer::{Lexer, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn token_style(kind: TokenKind, is_call: bool) -> Style {
    match kind {
        k if k.is_type_keyword() => Style::default().fg(DEFAULT_THEME.type_name),
        TokenKind::If
        | TokenKind::Else
        | TokenKind::While
        | TokenKind::For
        | TokenKind::Return
        | TokenKind::Break
        | TokenKind::Continue => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::StringLiteral | TokenKind::CharLiteral => {
            Style::default().fg(DEFAULT_THEME.string)
        }
        TokenKind::IntLiteral | TokenKind::FloatLiteral => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        TokenKind::Ident if is_call => Style::default().fg(DEFAULT_THEME.function),
        TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::LBracket
        | TokenKind::RBracket => Style::default().fg(DEFAULT_THEME.primary),
        TokenKind::Illegal => Style::default().fg(DEFAULT_THEME.error),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Highlight one line of C source
fn highlight_line(line: &str) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let tokens: Vec<_> = Lexer::new(line)
        .filter(|token| token.kind != TokenKind::Eof)
        .collect();

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (i, token) in tokens.iter().enumerate() {
        let start = token.location.column.saturating_sub(1).min(chars.len());
        let quoted = matches!(
            token.kind,
            TokenKind::StringLiteral | TokenKind::CharLiteral
        );
        let len = token.literal.chars().count() + if quoted { 2 } else { 0 };
        let mut end = (start + len).min(chars.len());
        if matches!(token.kind, TokenKind::IntLiteral | TokenKind::FloatLiteral) {
            // Suffix letters are dropped from the literal text
            while end < chars.len() && chars[end].is_ascii_alphanumeric() {
                end += 1;
            }
        }

        if start > cursor {
            spans.push(gap_span(&chars[cursor..start]));
        }
        let is_call = tokens
            .get(i + 1)
            .is_some_and(|next| next.kind == TokenKind::LParen);
        let text: String = chars[start.max(cursor)..end.max(cursor)].iter().collect();
        spans.push(Span::styled(text, token_style(token.kind, is_call)));
        cursor = end.max(cursor);
    }
    if cursor < chars.len() {
        spans.push(gap_span(&chars[cursor..]));
    }

    Line::from(spans)
}

/// Whitespace stays plain; anything else the lexer skipped is a comment
fn gap_span(chars: &[char]) -> Span<'static> {
    let text: String = chars.iter().collect();
    if text.trim().is_empty() {
        Span::raw(text)
    } else {
        Span::styled(text, Style::default().fg(DEFAULT_THEME.comment))
    }
}

/// Render the source code pane.
///
/// `current_line` is 1-based; 0 highlights nothing. The highlighted line is
/// kept at `target_line_row` within the pane.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
    is_focused: bool,
    target_line_row: &mut Option<usize>,
) {
    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();

    // Account for borders (2), min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    *target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    let mut offset = 0;
    if current_line > 0 && current_line <= total_lines {
        offset = (current_line - 1).saturating_sub(target_row);
        super::clamp_scroll(&mut offset, total_lines, visible_height);
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let marker = if is_current { "▶" } else { " " };
            let line_num_str = format!("{}{:4} ", marker, line_num);

            let mut content = highlight_line(line);

            let num_style = if is_current && is_error {
                for span in &mut content.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(background);
                }
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(line_num_str, num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let source = r#"  int x = f(1, "a b"); // note"#;
        assert_eq!(text_of(&highlight_line(source)), source);
    }

    #[test]
    fn test_highlight_styles() {
        let line = highlight_line("return foo(42);");
        let styled: Vec<(&str, Style)> = line
            .spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style))
            .collect();

        assert_eq!(styled[0].0, "return");
        assert_eq!(styled[0].1.fg, Some(DEFAULT_THEME.keyword));
        assert!(styled.contains(&("foo", Style::default().fg(DEFAULT_THEME.function))));
        assert!(styled.contains(&("42", Style::default().fg(DEFAULT_THEME.number))));
    }

    #[test]
    fn test_preprocessor_line_is_comment_colored() {
        let line = highlight_line("#include <stdio.h>");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.comment));
    }
}
