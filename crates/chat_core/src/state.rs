use crate::intent::{Intent, IntentRouter};
use crate::message::{Message, MessageBody, MessageId, Sender};
use crate::view_model::{AppViewModel, MessageView};

pub type TurnId = u64;

/// A dispatched request that has not completed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub turn_id: TurnId,
    pub intent: Intent,
    /// Typing placeholder to remove on completion, if still shown.
    pub placeholder: Option<MessageId>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    input: String,
    log: Vec<Message>,
    next_message_id: u64,
    last_turn_id: TurnId,
    pending: Option<PendingTurn>,
    router: IntentRouter,
    dirty: bool,
    scroll_requested: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose log starts with a single AI greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.add_message(greeting, Sender::Ai);
        state
    }

    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    pub fn view(&self) -> AppViewModel {
        let placeholder = self.pending.as_ref().and_then(|turn| turn.placeholder);
        AppViewModel {
            messages: self
                .log
                .iter()
                .map(|message| MessageView {
                    id: message.id,
                    sender: message.sender,
                    style_class: message.sender.style_class(),
                    text: message.text().to_string(),
                    link: message.link_target().map(ToOwned::to_owned),
                    placeholder: Some(message.id) == placeholder,
                })
                .collect(),
            input: self.input.clone(),
            send_enabled: self.pending.is_none(),
            dirty: self.dirty,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn pending(&self) -> Option<&PendingTurn> {
        self.pending.as_ref()
    }

    /// Appends a text message and asks the host to scroll to it.
    pub fn add_message(&mut self, text: impl Into<String>, sender: Sender) -> MessageId {
        self.push(sender, MessageBody::Text(text.into()))
    }

    pub(crate) fn add_link(
        &mut self,
        href: impl Into<String>,
        label: impl Into<String>,
        sender: Sender,
    ) -> MessageId {
        self.push(
            sender,
            MessageBody::Link {
                href: href.into(),
                label: label.into(),
            },
        )
    }

    fn push(&mut self, sender: Sender, body: MessageBody) -> MessageId {
        self.next_message_id += 1;
        let id = MessageId::new(self.next_message_id);
        self.log.push(Message { id, sender, body });
        self.dirty = true;
        self.scroll_requested = true;
        id
    }

    /// Removes the message with `id`. Returns false if it is no longer in the log.
    pub(crate) fn remove_message(&mut self, id: MessageId) -> bool {
        let Some(index) = self.log.iter().position(|message| message.id == id) else {
            return false;
        };
        self.log.remove(index);
        self.dirty = true;
        true
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn clear_input(&mut self) {
        self.set_input(String::new());
    }

    pub(crate) fn classify(&self, input: &str) -> Intent {
        self.router.classify(input)
    }

    pub(crate) fn begin_turn(&mut self, intent: Intent, placeholder: Option<MessageId>) -> TurnId {
        self.last_turn_id += 1;
        let turn_id = self.last_turn_id;
        self.pending = Some(PendingTurn {
            turn_id,
            intent,
            placeholder,
        });
        self.dirty = true;
        turn_id
    }

    /// Takes the pending turn if it is `turn_id` and `accept` agrees with its intent.
    pub(crate) fn finish_turn(
        &mut self,
        turn_id: TurnId,
        accept: impl FnOnce(&Intent) -> bool,
    ) -> Option<PendingTurn> {
        match &self.pending {
            Some(turn) if turn.turn_id == turn_id && accept(&turn.intent) => {
                self.dirty = true;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub(crate) fn latest_link(&self) -> Option<&str> {
        self.log.iter().rev().find_map(Message::link_target)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True once after any append; the host scrolls the log to its newest entry.
    pub fn consume_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}
