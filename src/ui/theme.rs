//! Color palette shared by every pane

use ratatui::style::Color;

pub struct Theme {
    /// Default text
    pub fg: Color,
    /// Step counter and brackets
    pub primary: Color,
    /// Line number of the next statement, auto-play badge
    pub secondary: Color,
    /// Comments, skipped text, separators
    pub comment: Color,
    pub success: Color,
    pub error: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    /// Background behind the next statement and the status bar
    pub current_line_bg: Color,
    /// Called names and scope headers
    pub function: Color,
    pub type_name: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(203, 166, 247),
    string: Color::Rgb(166, 227, 161),
    number: Color::Rgb(250, 179, 135),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    function: Color::Rgb(249, 226, 175),
    type_name: Color::Rgb(148, 226, 213),
};
