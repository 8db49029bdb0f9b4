use std::sync::{mpsc, Arc};
use std::thread;

use chat_core::{Effect, Msg, TurnFailure};
use chat_engine::{BackendError, EngineEvent, EngineHandle};
use chat_logging::{chat_info, chat_warn};

use super::app::LoopEvent;

/// Opens link targets outside the terminal.
pub trait LinkOpener: Send {
    fn open(&self, href: &str) -> Result<(), String>;
}

/// Uses the platform's default browser.
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, href: &str) -> Result<(), String> {
        open::that_detached(href).map_err(|err| err.to_string())
    }
}

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    opener: Box<dyn LinkOpener>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        opener: Box<dyn LinkOpener>,
        event_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
            opener,
        };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestChat { turn_id, query } => {
                    chat_info!("RequestChat turn_id={} query_len={}", turn_id, query.len());
                    self.engine.request_chat(turn_id, query);
                }
                Effect::RequestRoute {
                    turn_id,
                    origin,
                    destination,
                } => {
                    chat_info!(
                        "RequestRoute turn_id={} origin={} destination={}",
                        turn_id,
                        origin,
                        destination
                    );
                    self.engine.request_route(turn_id, origin, destination);
                }
                Effect::OpenLink { href } => {
                    if let Err(err) = self.opener.open(&href) {
                        chat_warn!("Failed to open {}: {}", href, err);
                    }
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<LoopEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                if event_tx.send(LoopEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatCompleted { turn_id, result } => Msg::ChatCompleted {
            turn_id,
            result: result.map(|reply| reply.response).map_err(map_failure),
        },
        EngineEvent::RouteCompleted { turn_id, result } => Msg::RouteCompleted {
            turn_id,
            result: result.map(|reply| reply.map_url).map_err(map_failure),
        },
    }
}

fn map_failure(err: BackendError) -> TurnFailure {
    if err.kind.is_transport() {
        TurnFailure::Transport
    } else {
        TurnFailure::Application
    }
}
