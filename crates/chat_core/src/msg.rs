use crate::TurnId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the input line.
    InputChanged(String),
    /// User clicked the send trigger.
    SendClicked,
    /// User pressed Enter while the input had focus.
    EnterPressed,
    /// Chat endpoint finished for a turn.
    ChatCompleted {
        turn_id: TurnId,
        result: Result<String, TurnFailure>,
    },
    /// Route endpoint finished for a turn; `Ok` carries the map URL.
    RouteCompleted {
        turn_id: TurnId,
        result: Result<String, TurnFailure>,
    },
    /// User asked to open the most recent link in the log.
    OpenLatestLink,
}

/// Why a turn failed. Both kinds are shown to the user the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnFailure {
    /// The request never completed.
    Transport,
    /// Non-success status or a body that could not be understood.
    Application,
}
