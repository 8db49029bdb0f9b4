use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use chat_logging::{chat_turn, chat_warn};
use log::Level;

use crate::backend::{Backend, BackendSettings, ReqwestBackend};
use crate::{BackendError, EngineEvent, TurnId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] BackendError),
}

enum EngineCommand {
    Chat {
        turn_id: TurnId,
        query: String,
    },
    Route {
        turn_id: TurnId,
        origin: String,
        destination: String,
    },
}

/// Runs backend requests on a dedicated thread that owns a tokio runtime.
///
/// Requests are fire-and-forget from the caller's side; each one produces
/// exactly one [`EngineEvent`]. Dropping the handle stops the worker.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(backend.as_ref(), command).await;
                    if event_tx.send(event).is_err() {
                        chat_warn!("engine event dropped: receiver gone");
                    }
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn request_chat(&self, turn_id: TurnId, query: impl Into<String>) {
        self.send(EngineCommand::Chat {
            turn_id,
            query: query.into(),
        });
    }

    pub fn request_route(
        &self,
        turn_id: TurnId,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) {
        self.send(EngineCommand::Route {
            turn_id,
            origin: origin.into(),
            destination: destination.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            chat_warn!("engine worker has stopped; request dropped");
        }
    }

    /// Blocks until the next event. `None` once the worker has stopped and
    /// every event has been delivered.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Chat { turn_id, query } => {
            let result = backend.chat(&query).await;
            log_outcome(turn_id, "chat", result.as_ref().err());
            EngineEvent::ChatCompleted { turn_id, result }
        }
        EngineCommand::Route {
            turn_id,
            origin,
            destination,
        } => {
            let result = backend.route(&origin, &destination).await;
            log_outcome(turn_id, "route", result.as_ref().err());
            EngineEvent::RouteCompleted { turn_id, result }
        }
    }
}

fn log_outcome(turn_id: TurnId, endpoint: &str, error: Option<&BackendError>) {
    match error {
        None => chat_turn!(Level::Debug, turn_id, "{} ok", endpoint),
        Some(err) => chat_turn!(Level::Warn, turn_id, "{} failed: {}", endpoint, err),
    }
}
