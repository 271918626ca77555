//! Stepper application state and key handling

use crate::interpreter::{Interpreter, StepOutcome};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps while auto-playing
const PLAY_INTERVAL: Duration = Duration::from_millis(500);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Scopes,
    Terminal,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> terminal -> scopes)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Scopes,
            FocusedPane::Scopes => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance, with stepping enabled
    pub interpreter: Interpreter,

    /// The source code being executed
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Scroll offsets for the list panes
    pub scopes_scroll: usize,
    pub terminal_scroll: usize,

    /// Target visual row for the highlighted line (None = not initialized yet)
    pub target_line_row: Option<usize>,

    /// Number of statements executed since the last reset
    pub steps: usize,

    /// Whether the most recent step reported a runtime error
    pub has_error: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// When auto-play last stepped
    pub last_play_time: Instant,

    /// When Space was last accepted; repeats inside 200ms are ignored
    pub last_space_press: Instant,
}

impl App {
    /// Wrap `interpreter` for stepping; `source_code` feeds the source pane
    pub fn new(mut interpreter: Interpreter, source_code: String) -> Self {
        interpreter.enable_stepping();
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        App {
            interpreter,
            source_code,
            focused_pane: FocusedPane::Source,
            scopes_scroll: 0,
            terminal_scroll: 0,
            target_line_row: None,
            steps: 0,
            has_error: false,
            should_quit: false,
            status_message: String::from("Ready! Press → to step"),
            is_playing: false,
            last_play_time: long_ago,
            last_space_press: long_ago,
        }
    }

    /// Draw and handle input until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                self.step();
                if self.interpreter.is_finished() || self.has_error {
                    self.is_playing = false;
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Line to highlight: the next statement, or the last one once finished
    pub fn highlighted_line(&self) -> usize {
        match self.interpreter.next_location() {
            Some(location) => location.line,
            None if self.steps > 0 => self.interpreter.current_location().line,
            None => 0,
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Source above terminal output on the left
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let highlighted = self.highlighted_line();
        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            highlighted,
            self.has_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.target_line_row,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.terminal(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        super::panes::render_scopes_pane(
            frame,
            columns[1],
            &self.interpreter,
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scopes_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.steps,
            self.interpreter.is_finished(),
            self.has_error,
            self.is_playing,
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Right | KeyCode::Char('s') => {
                self.is_playing = false;
                self.step();
            }
            KeyCode::Char('r') => {
                self.is_playing = false;
                self.run_to_end();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.reset();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => self.scroll_focused(false),
            KeyCode::Down => self.scroll_focused(true),
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing && !self.interpreter.is_finished();
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            _ => {}
        }
    }

    /// Scroll the focused pane by one line
    fn scroll_focused(&mut self, down: bool) {
        let nudge = |value: usize, forward: bool| {
            if forward {
                value.saturating_add(1)
            } else {
                value.saturating_sub(1)
            }
        };
        match self.focused_pane {
            // The source pane pins the highlighted line to a row; scrolling
            // down moves that row up
            FocusedPane::Source => {
                self.target_line_row = self.target_line_row.map(|row| nudge(row, !down));
            }
            FocusedPane::Scopes => self.scopes_scroll = nudge(self.scopes_scroll, down),
            FocusedPane::Terminal => self.terminal_scroll = nudge(self.terminal_scroll, down),
        }
    }

    /// Execute one statement and describe the outcome
    pub fn step(&mut self) {
        match self.interpreter.step() {
            Ok(outcome) => {
                if outcome.statement.is_some() {
                    self.steps += 1;
                }
                self.has_error = outcome.error.is_some();
                self.status_message = describe(&outcome);
                // Follow the newest output
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.has_error = true;
                self.status_message = format!("Cannot step: {}", e);
            }
        }
    }

    /// Step until `main` finishes or a statement fails
    pub fn run_to_end(&mut self) {
        while !self.interpreter.is_finished() {
            self.step();
            if self.has_error {
                break;
            }
        }
    }

    /// Start over from the first statement
    pub fn reset(&mut self) {
        self.interpreter.reset();
        self.steps = 0;
        self.has_error = false;
        self.terminal_scroll = 0;
        self.scopes_scroll = 0;
        self.status_message = "Reset to start".to_string();
    }
}

fn describe(outcome: &StepOutcome) -> String {
    if let Some(error) = &outcome.error {
        return format!("Error: {}", error);
    }
    if outcome.finished {
        return match &outcome.return_value {
            Some(value) => format!("Finished, main returned {}", value),
            None => "Finished".to_string(),
        };
    }
    match (&outcome.statement, outcome.location) {
        (Some(stmt), Some(location)) => {
            format!("Line {}: {}", location.line, stmt.summary())
        }
        _ => "Stepped".to_string(),
    }
}
