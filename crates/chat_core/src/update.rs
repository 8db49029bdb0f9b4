use chat_logging::{chat_debug, chat_turn, chat_warn};
use log::Level;

use crate::message::{
    route_status_text, CHAT_ERROR_TEXT, ROUTE_ERROR_TEXT, ROUTE_LINK_LABEL, TYPING_PLACEHOLDER,
};
use crate::{AppState, Effect, Intent, Msg, Sender, TurnFailure, TurnId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked | Msg::EnterPressed => send(&mut state),
        Msg::ChatCompleted { turn_id, result } => {
            complete_chat(&mut state, turn_id, result);
            Vec::new()
        }
        Msg::RouteCompleted { turn_id, result } => {
            complete_route(&mut state, turn_id, result);
            Vec::new()
        }
        Msg::OpenLatestLink => match state.latest_link() {
            Some(href) => vec![Effect::OpenLink {
                href: href.to_string(),
            }],
            None => Vec::new(),
        },
    };

    (state, effects)
}

fn send(state: &mut AppState) -> Vec<Effect> {
    let query = state.input().trim().to_string();
    if query.is_empty() {
        return Vec::new();
    }
    // One outstanding turn at a time; the input is kept for a later send.
    if let Some(turn) = state.pending() {
        chat_debug!("send ignored while turn {} is outstanding", turn.turn_id);
        return Vec::new();
    }

    state.add_message(query.clone(), Sender::User);
    state.clear_input();
    let placeholder = state.add_message(TYPING_PLACEHOLDER, Sender::Ai);

    match state.classify(&query) {
        Intent::Route {
            origin,
            destination,
        } => {
            state.remove_message(placeholder);
            state.add_message(route_status_text(&origin, &destination), Sender::Ai);
            let turn_id = state.begin_turn(
                Intent::Route {
                    origin: origin.clone(),
                    destination: destination.clone(),
                },
                None,
            );
            chat_turn!(Level::Info, turn_id, "route {} -> {}", origin, destination);
            vec![Effect::RequestRoute {
                turn_id,
                origin,
                destination,
            }]
        }
        Intent::Chat { query } => {
            let turn_id = state.begin_turn(
                Intent::Chat {
                    query: query.clone(),
                },
                Some(placeholder),
            );
            chat_turn!(Level::Info, turn_id, "chat query_len={}", query.len());
            vec![Effect::RequestChat { turn_id, query }]
        }
    }
}

fn complete_chat(state: &mut AppState, turn_id: TurnId, result: Result<String, TurnFailure>) {
    let Some(turn) = state.finish_turn(turn_id, |intent| matches!(intent, Intent::Chat { .. }))
    else {
        chat_warn!("ignoring chat completion for stale turn {}", turn_id);
        return;
    };
    if let Some(placeholder) = turn.placeholder {
        state.remove_message(placeholder);
    }
    match result {
        Ok(response) => {
            state.add_message(response, Sender::Ai);
        }
        Err(failure) => {
            chat_turn!(Level::Warn, turn_id, "chat failed: {:?}", failure);
            state.add_message(CHAT_ERROR_TEXT, Sender::Ai);
        }
    }
}

fn complete_route(state: &mut AppState, turn_id: TurnId, result: Result<String, TurnFailure>) {
    if state
        .finish_turn(turn_id, |intent| matches!(intent, Intent::Route { .. }))
        .is_none()
    {
        chat_warn!("ignoring route completion for stale turn {}", turn_id);
        return;
    }
    match result {
        Ok(map_url) => {
            state.add_link(map_url, ROUTE_LINK_LABEL, Sender::Ai);
        }
        Err(failure) => {
            chat_turn!(Level::Warn, turn_id, "route failed: {:?}", failure);
            state.add_message(ROUTE_ERROR_TEXT, Sender::Ai);
        }
    }
}
