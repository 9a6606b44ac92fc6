use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, ControlCmd, Controller, Flow, InputMode};
use crate::config;
use crate::engine::{DecoderFactory, Engine, EngineEvent};
use crate::ui;

/// Key prefixes tracked by the event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pending_zz: bool,
}

impl EventLoopState {
    fn clear_prefixes(&mut self) {
        self.pending_gg = false;
        self.pending_zz = false;
    }
}

/// Main terminal event loop: applies engine events, draws, and turns key
/// presses into commands. Returns `Ok(())` when shutdown is requested.
pub fn run<E, F>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<E, F>,
    events: &Receiver<EngineEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>>
where
    E: Engine,
    F: DecoderFactory<Decoder = E::Decoder>,
{
    loop {
        // Engine callbacks are applied here, on the control thread.
        while let Ok(event) = events.try_recv() {
            controller.on_event(app, event);
        }
        app.apply_playlist_changes();

        let position = controller.engine().position();
        terminal.draw(|f| ui::draw(f, app, position, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(cmd) = handle_key_event(key, settings, app, state) else {
                    continue;
                };
                if controller.handle(app, cmd) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply navigation keys directly and map the rest to a [`ControlCmd`].
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> Option<ControlCmd> {
    if matches!(app.input, InputMode::AddPath(_)) {
        state.clear_prefixes();
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Enter => return app.take_input().map(|p| ControlCmd::Add(vec![p])),
            KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
            _ => {}
        }
        return None;
    }

    let seek = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
    let cmd = match key.code {
        KeyCode::Char('q') => Some(ControlCmd::Quit),
        KeyCode::Char('a') => {
            app.begin_add_path();
            None
        }
        KeyCode::Char('d') | KeyCode::Delete => Some(ControlCmd::RemoveSelected),
        KeyCode::Enter => {
            app.follow_playback_on();
            Some(ControlCmd::PlaySelected)
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(ControlCmd::PlayPause),
        KeyCode::Char('s') => Some(ControlCmd::Stop),
        KeyCode::Char('l') => Some(ControlCmd::SkipForward),
        KeyCode::Char('h') => Some(ControlCmd::SkipBackward),
        KeyCode::Char('L') => Some(ControlCmd::SeekBy(seek)),
        KeyCode::Char('H') => Some(ControlCmd::SeekBy(-seek)),
        KeyCode::Char('K') => {
            app.toggle_details_window();
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
            None
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                app.follow_playback_off();
                app.select_first();
            }
            let armed = !state.pending_gg;
            state.clear_prefixes();
            state.pending_gg = armed;
            return None;
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
            None
        }
        KeyCode::Char('z') => {
            if state.pending_zz {
                app.follow_playback_on();
            }
            let armed = !state.pending_zz;
            state.clear_prefixes();
            state.pending_zz = armed;
            return None;
        }
        _ => None,
    };

    // Any other key cancels a pending prefix.
    state.clear_prefixes();
    cmd
}
