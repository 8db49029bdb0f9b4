use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use chat_core::{update, AppState, Msg};
use chat_engine::EngineHandle;
use chat_logging::{chat_error, chat_info};
use crossterm::event::{self, Event, KeyEvent};

use super::config::{AppConfig, CONFIG_FILENAME};
use super::effects::{EffectRunner, SystemBrowser};
use super::logging;
use super::ui::constants::SCROLL_STEP;
use super::ui::input::{self, Action};
use super::ui::terminal::TerminalSession;

/// Everything the main loop reacts to, from the input thread or the engine.
pub(crate) enum LoopEvent {
    Key(KeyEvent),
    Resize,
    Msg(Msg),
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    logging::initialize(config.log_destination);
    match &config.source {
        Some(path) => chat_info!("Loaded config from {:?}", path),
        None => chat_info!("No {} found, using defaults", CONFIG_FILENAME),
    }
    chat_info!("Starting chat client against {}", config.base_url);

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let engine =
        EngineHandle::new(config.backend_settings()).context("starting request engine")?;
    let runner = EffectRunner::new(engine, Box::new(SystemBrowser), event_tx.clone());

    let state = match config.greeting {
        Some(greeting) => AppState::with_greeting(greeting),
        None => AppState::new(),
    };

    let terminal = TerminalSession::enter().context("preparing terminal")?;
    spawn_input_thread(event_tx);

    let mut app = ChatApp::new(state, runner, terminal);
    let result = app.run(&event_rx);
    chat_info!("Chat client stopped");
    result.context("terminal i/o failed")
}

fn spawn_input_thread(event_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                chat_error!("Reading terminal input failed: {}", err);
                break;
            }
        };
        let forwarded = match event {
            Event::Key(key) => LoopEvent::Key(key),
            Event::Resize(..) => LoopEvent::Resize,
            _ => continue,
        };
        if event_tx.send(forwarded).is_err() {
            break;
        }
    });
}

struct ChatApp {
    state: AppState,
    runner: EffectRunner,
    terminal: TerminalSession,
    /// Rows scrolled up from the newest entry.
    scroll_offset: usize,
    needs_redraw: bool,
}

impl ChatApp {
    fn new(state: AppState, runner: EffectRunner, terminal: TerminalSession) -> Self {
        Self {
            state,
            runner,
            terminal,
            scroll_offset: 0,
            needs_redraw: true,
        }
    }

    fn run(&mut self, event_rx: &mpsc::Receiver<LoopEvent>) -> io::Result<()> {
        self.redraw()?;
        while let Ok(event) = event_rx.recv() {
            match event {
                LoopEvent::Key(key) => match input::translate(&key, self.state.input()) {
                    Some(Action::Quit) => break,
                    Some(Action::Msg(msg)) => self.dispatch_msg(msg),
                    Some(Action::ScrollUp) => self.scroll_by(SCROLL_STEP as isize),
                    Some(Action::ScrollDown) => self.scroll_by(-(SCROLL_STEP as isize)),
                    None => {}
                },
                LoopEvent::Resize => self.needs_redraw = true,
                LoopEvent::Msg(msg) => self.dispatch_msg(msg),
            }
            if self.needs_redraw {
                self.redraw()?;
            }
        }
        Ok(())
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_scroll_request() {
            self.scroll_offset = 0;
        }
        if state.consume_dirty() {
            self.needs_redraw = true;
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.needs_redraw = true;
    }

    fn redraw(&mut self) -> io::Result<()> {
        let view = self.state.view();
        self.scroll_offset = self.terminal.draw(&view, self.scroll_offset)?;
        self.needs_redraw = false;
        Ok(())
    }
}
