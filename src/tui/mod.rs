//! Terminal User Interface module for textlens.
//!
//! Provides a two-panel TUI with the text input and the insights accordion,
//! using ratatui for rendering and crossterm for terminal management.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::analyzer::{AnalyzerClientBuilder, AnalyzerClientTrait};
use crate::config::Config;
use crate::worker::AnalysisWorker;

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, Row};

const TICK: Duration = Duration::from_millis(100);
const WORKER_STOPPED: &str = "analysis worker stopped";

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Must run before exiting, even on error, to avoid leaving the shell in raw mode.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal, then runs the original hook.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, worker: &AnalysisWorker) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, worker, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    worker: &AnalysisWorker,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(TICK)?
            && let Event::Key(key) = crossterm_event::read()?
            && key.kind == KeyEventKind::Press
            && event::handle_key_event(app, key)
        {
            break;
        }

        pump(app, worker);
    }

    Ok(())
}

/// Fires any debounced request and applies finished outcomes.
///
/// Called once per tick; separated from the loop so it runs without a terminal.
pub fn pump(app: &mut App, worker: &AnalysisWorker) {
    if let Some((generation, text)) = app.take_pending_request() {
        debug!(generation, "debounce elapsed, submitting analysis");
        if !worker.submit(generation, text) {
            warn!(generation, "analysis worker is not running");
            app.fail_request(generation, WORKER_STOPPED);
        }
    }

    // Checked before draining so every outcome sent before exit is applied.
    let running = worker.is_running();
    while let Some(outcome) = worker.try_recv() {
        app.apply_outcome(outcome);
    }

    if !running && app.is_loading() && app.fail_request(app.generation(), WORKER_STOPPED) {
        warn!("analysis worker stopped with a request in flight");
    }
}

/// Entry point for the TUI application.
///
/// Builds the HTTP client from `config`, starts the analysis worker and runs
/// the event loop. `initial_text` is analyzed right away when given.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the terminal fails.
pub fn run(config: &Config, initial_text: Option<String>) -> Result<()> {
    init_panic_hook();

    let client = AnalyzerClientBuilder::new()
        .base_url(&config.api_url)
        .timeout(config.request_timeout)
        .build()
        .context("Failed to create analysis client")?;
    info!(api_url = client.base_url(), "starting TUI");

    let client: Arc<dyn AnalyzerClientTrait> = Arc::new(client);
    let worker = AnalysisWorker::spawn(client);

    let mut app = App::new(config.debounce);
    if let Some(text) = initial_text {
        app.set_text(text);
    }

    run_event_loop(&mut app, &worker).context("TUI event loop failed")?;

    info!("TUI exited");
    Ok(())
}
