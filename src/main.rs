// cstep: single-step interpreter for a K&R subset of C

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use cstep::interpreter::{Config, Interpreter};
use cstep::ui::App;

/// Step through a C program one statement of `main` at a time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// C source file to load
    file: PathBuf,

    /// Run to completion and print output instead of opening the stepper
    #[arg(short, long)]
    run: bool,

    /// Evaluate both operands of `&&` and `||`
    #[arg(long)]
    eager_logic: bool,

    /// Maximum nesting of user function calls
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    // The TUI owns the screen; only --run logs
    if args.run {
        init_logging(args.verbose);
    }

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;

    let mut config = Config::default()
        .with_echo_output(args.run)
        .with_short_circuit(!args.eager_logic);
    if let Some(depth) = args.max_depth {
        config = config.with_max_call_depth(depth);
    }

    let mut interpreter = Interpreter::from_source_with_config(&source, config)
        .with_context(|| format!("failed to parse '{}'", args.file.display()))?;

    if args.run {
        let value = interpreter.run().context("runtime error")?;
        // Process exit codes keep only the low byte
        let code = value.as_int().unwrap_or(0) as u8;
        return Ok(ExitCode::from(code));
    }

    run_tui(interpreter, source)?;
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run_tui(interpreter: Interpreter, source: String) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}
