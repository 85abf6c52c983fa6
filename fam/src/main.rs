//! Fate aspect manager.
//!
//! A vim-style terminal interface for tracking Fate objects (PCs, NPCs,
//! locations, situations, objects) and how often each of their aspects is
//! used during play.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting
//! and automated testing:
//!
//! ```bash
//! cargo run -p fam -- --headless campaign.fam
//! ```

mod app;
mod config;
mod events;
mod headless;
mod logging;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fam_core::{CountPolicy, Session, SessionError};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use thiserror::Error;

use app::App;
use config::Config;
use events::{handle_event, EventResult};
use ui::render::render;

/// Failures that end the program.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("could not open session: {0}")]
    Session(#[from] SessionError),

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Session(_) | AppError::Io(_) => 1,
        }
    }
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    if let Err(e) = run() {
        error!("exiting: {e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if let Err(e) = logging::init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {e}");
    }
    info!(
        "starting fam on {} (headless: {})",
        config.file.display(),
        config.headless
    );

    let policy = if config.keep_counts {
        CountPolicy::Preserve
    } else {
        CountPolicy::Reset
    };
    let session = Session::open_or_new(config.file.clone(), policy)?;

    if config.headless {
        return headless::run_headless(session).map_err(AppError::from);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    info!("fam exited cleanly");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        if event::poll(Duration::from_millis(250))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Fate Aspect Manager - track Fate objects and aspect usage");
    println!();
    println!("USAGE:");
    println!("  fam [OPTIONS] [FILE]");
    println!();
    println!("ARGS:");
    println!("  FILE            File to open (default: {})", fam_core::DEFAULT_FILE_NAME);
    println!();
    println!("OPTIONS:");
    println!("  -h, --help      Show this help message");
    println!("  -d, --debug     Log at debug level");
    println!("  --headless      Line-oriented mode on stdin/stdout");
    println!("  --keep-counts   Restore aspect counts when loading");
    println!();
    println!("ENVIRONMENT:");
    println!("  {}        File to open when FILE is not given", config::ENV_FILE);
    println!("  {}   Log level (error|warn|info|debug|trace)", config::ENV_LOG_LEVEL);
    println!("  {}     Log directory (default: ./logs)", config::ENV_LOG_DIR);
    println!();
    println!("KEYS:");
    println!("  j/k             Select next / previous object");
    println!("  J/K             Select next / previous aspect");
    println!("  Enter, Space    Use the selected aspect");
    println!("  1-5             New PC / NPC / location / situation / object");
    println!("  r, a, x         Rename, add aspect, remove");
    println!("  w, :w [path]    Save");
    println!("  :e, :m <path>   Open or merge a file");
    println!("  ?               Help");
    println!("  q, :q!          Quit");
}
