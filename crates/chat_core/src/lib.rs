//! Chat core: pure controller state machine, intent classification and view-model helpers.
mod effect;
mod intent;
mod message;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use intent::{Intent, IntentClassifier, IntentRouter, RoutePatternClassifier};
pub use message::{
    route_status_text, Message, MessageBody, MessageId, Sender, CHAT_ERROR_TEXT,
    DEFAULT_GREETING, ROUTE_ERROR_TEXT, ROUTE_LINK_LABEL, TYPING_PLACEHOLDER,
};
pub use msg::{Msg, TurnFailure};
pub use state::{AppState, PendingTurn, TurnId};
pub use update::update;
pub use view_model::{AppViewModel, MessageView};
