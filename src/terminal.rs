//! Captured program output
//!
//! Every built-in that produces output writes into a [`Terminal`] owned by the
//! interpreter. Chunks remember the source location that produced them so a
//! host can relate output to statements.

use crate::parser::ast::SourceLocation;
use std::io::Write;

/// A chunk of output with source location tracking
#[derive(Debug, Clone, PartialEq)]
pub struct OutputChunk {
    pub text: String,
    pub location: SourceLocation,
}

/// Output buffer for printf/putchar
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    chunks: Vec<OutputChunk>,
    echo: bool,
}

impl Terminal {
    pub fn new(echo: bool) -> Self {
        Terminal {
            chunks: Vec::new(),
            echo,
        }
    }

    /// Record output; consecutive writes from the same line are merged
    pub fn write(&mut self, text: &str, location: SourceLocation) {
        if text.is_empty() {
            return;
        }
        if self.echo {
            let mut stdout = std::io::stdout();
            // A closed stdout is not an interpreter error
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }

        if let Some(last) = self.chunks.last_mut() {
            if last.location.line == location.line {
                last.text.push_str(text);
                return;
            }
        }
        self.chunks.push(OutputChunk {
            text: text.to_string(),
            location,
        });
    }

    pub fn chunks(&self) -> &[OutputChunk] {
        &self.chunks
    }

    /// Everything written so far
    pub fn output(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Output split into display lines; a trailing newline adds no empty line
    pub fn lines(&self) -> Vec<String> {
        let output = self.output();
        let mut lines: Vec<String> = output.split('\n').map(str::to_string).collect();
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
