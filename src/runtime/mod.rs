use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::{App, Controller};
use crate::audio::{RodioEngine, RodioFactory};
use crate::session::resolve_session_path;

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    logging::init(&settings.log)?;
    if let Some(msg) = settings_problem {
        error!("{msg}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting segue");

    let cli_paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let session_path = if settings.playlist.persist {
        resolve_session_path()
    } else {
        None
    };
    let session = startup::load_session(session_path.as_deref());
    let (playlist, changed) = startup::build_playlist(&settings, &session, &cli_paths);

    let mut app = App::new(playlist, settings.ui.follow_playback);
    app.playlist_changed = changed;

    let (event_tx, event_rx) = mpsc::channel();
    let engine = RodioEngine::spawn(&settings.audio, event_tx)?;
    let factory = RodioFactory::new(&settings.formats);
    let mut controller = Controller::new(engine, factory, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut controller,
            &event_rx,
            &mut state,
        )
    })();

    controller
        .engine_mut()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(path) = &session_path {
        startup::save_session(path, &app);
    }
    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }

    run_result
}
