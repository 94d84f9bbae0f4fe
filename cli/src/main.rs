//! Mind Reader CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`mindreader_engine`] (round state) and [`mindreader_tui`]
//! (rendering and input), providing RAII-based terminal management with
//! guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new(mode) -> run_app_{full,inline}() -> App + TUI
//!                                              |
//!                                              v
//!                               RunResult::Quit | SwitchMode
//! ```
//!
//! # Event Loop
//!
//! Both full-screen and inline modes use a fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`mindreader_tui::InputPump`])
//! 3. Advance application state (`app.tick()`)
//! 4. Collect finished rounds from their tasks
//! 5. Render frame, remembering where the keypad landed for mouse hit-testing
//! 6. Check for mode switch or quit

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{TerminalOptions, Viewport, prelude::*};
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mindreader_engine::{App, MindReaderConfig};
use mindreader_tui::{
    INLINE_VIEWPORT_HEIGHT, InlineOutput, InputPump, KeypadLayout, clear_inline_viewport, draw,
    draw_inline, handle_events,
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.mindreader/logs/mindreader.log
    if let Some(config_path) = MindReaderConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("mindreader.log"));
    }

    // Fallback: ./.mindreader/logs/mindreader.log
    candidates.push(PathBuf::from(".mindreader").join("logs").join("mindreader.log"));

    candidates
}

/// Config problems are logged and play continues on defaults.
fn load_config() -> Option<MindReaderConfig> {
    match MindReaderConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %e.path().display(), error = %e, "Ignoring config file");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiMode {
    Full,
    Inline,
}

impl UiMode {
    fn toggle(self) -> Self {
        match self {
            UiMode::Full => UiMode::Inline,
            UiMode::Inline => UiMode::Full,
        }
    }

    fn from_config(config: Option<&MindReaderConfig>) -> Option<Self> {
        let raw = MindReaderConfig::tui_mode(config)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(UiMode::Inline),
            "full" | "fullscreen" => Some(UiMode::Full),
            other => {
                tracing::warn!("Unknown tui mode in config: {}", other);
                None
            }
        }
    }
}

enum RunResult {
    Quit,
    SwitchMode,
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Manages raw mode, mouse capture (keypad clicks) and, in full mode, the
/// alternate screen. On drop, all terminal state is restored so the terminal
/// stays usable even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    use_alternate_screen: bool,
}

impl TerminalSession {
    fn new(mode: UiMode) -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let use_alternate_screen = matches!(mode, UiMode::Full);
        if use_alternate_screen && let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableMouseCapture);
            return Err(err.into());
        }

        let backend = CrosstermBackend::new(out);
        let terminal = match mode {
            UiMode::Full => Terminal::new(backend),
            UiMode::Inline => Terminal::with_options(
                backend,
                TerminalOptions {
                    viewport: Viewport::Inline(INLINE_VIEWPORT_HEIGHT),
                },
            ),
        };
        let terminal = match terminal {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let mut out = stdout();
                if use_alternate_screen {
                    let _ = execute!(out, LeaveAlternateScreen, DisableMouseCapture);
                } else {
                    let _ = execute!(out, DisableMouseCapture);
                }
                return Err(err.into());
            }
        };

        Ok(Self {
            terminal,
            use_alternate_screen,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        if self.use_alternate_screen {
            let _ = execute!(
                self.terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            );
        } else {
            let _ = clear_inline_viewport(&mut self.terminal);
            let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture);
        }
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let mut ui_mode = UiMode::from_config(config.as_ref()).unwrap_or(UiMode::Full);
    let mut app = App::new(config.as_ref())?;
    tracing::info!(predictor = app.predictor_label(), ui = ?ui_mode, "Starting UI");
    let probe = app.spawn_probe();

    loop {
        let run_result = {
            let mut session = TerminalSession::new(ui_mode)?;
            match ui_mode {
                UiMode::Full => run_app_full(&mut session.terminal, &mut app).await,
                UiMode::Inline => run_app_inline(&mut session.terminal, &mut app).await,
            }
        };

        match run_result {
            Ok(RunResult::SwitchMode) => {
                ui_mode = ui_mode.toggle();
            }
            Ok(RunResult::Quit) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    probe.abort();
    let score = app.snapshot().score;
    tracing::info!(ai = score.ai, human = score.human, "Session ended");
    println!("Final score: AI {} - You {}", score.ai, score.human);

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app_full<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<RunResult>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut keypad = KeypadLayout::default();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<RunResult> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input, &keypad) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(RunResult::Quit);
        }

        app.tick();
        app.process_round_events();

        if let Err(e) = terminal.draw(|frame| keypad = draw(frame, app)) {
            break Err(e.into());
        }

        if app.take_toggle_screen_mode() {
            break Ok(RunResult::SwitchMode);
        }
    };

    input.shutdown().await;
    result
}

async fn run_app_inline<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<RunResult>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut output = InlineOutput::resume_from(app);
    let mut input = InputPump::new();
    let mut keypad = KeypadLayout::default();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<RunResult> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input, &keypad) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(RunResult::Quit);
        }

        app.tick();
        app.process_round_events();

        if let Err(e) = output.flush(terminal, app) {
            break Err(e.into());
        }

        if let Err(e) = terminal.draw(|frame| keypad = draw_inline(frame, app)) {
            break Err(e.into());
        }

        if app.take_toggle_screen_mode() {
            if let Err(e) = clear_inline_viewport(terminal) {
                break Err(e.into());
            }
            break Ok(RunResult::SwitchMode);
        }
    };

    input.shutdown().await;
    result
}
