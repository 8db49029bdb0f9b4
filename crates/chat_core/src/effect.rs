use crate::TurnId;

/// Side effects requested by [`crate::update`]; executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `{query}` to the chat endpoint.
    RequestChat { turn_id: TurnId, query: String },
    /// POST `{origin, destination}` to the route endpoint.
    RequestRoute {
        turn_id: TurnId,
        origin: String,
        destination: String,
    },
    /// Open a link target in an external browsing context.
    OpenLink { href: String },
}
