//! Chat engine: HTTP backend client and background request execution.
mod backend;
mod engine;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    BackendError, ChatReply, ChatRequest, EngineEvent, FailureKind, RouteReply, RouteRequest,
    TurnId,
};
