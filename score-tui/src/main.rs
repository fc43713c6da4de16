use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use score_core::Session;
use tracing::info;

mod app;
mod config;
mod snapshot;
mod ui;

use crate::app::App;
use crate::config::Config;

fn main() -> Result<()> {
    let config = Config::new();
    init_logging(&config)?;

    info!("Starting Plink...");
    let session = load_session(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(session, config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Flush whatever the last mutation left pending.
    app.maybe_save_snapshot();

    res.map_err(Into::into)
}

/// Logs go to a file, never to stdout: the terminal belongs to the UI.
/// Without a log file configured, logging stays off entirely.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_session(config: &Config) -> Session {
    match snapshot::load(config.snapshot_path.as_deref()) {
        Ok(snap) => {
            info!(
                games = snap.games.len(),
                profiles = snap.profiles.len(),
                "loaded snapshot"
            );
            Session::from_parts(snap.games, snap.profiles, config.session())
        }
        Err(err) => {
            tracing::debug!("no usable snapshot ({err}), starting fresh");
            Session::new(config.session())
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.config.tick_rate;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.on_tick(Instant::now());
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
