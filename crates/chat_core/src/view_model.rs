use crate::{MessageId, Sender};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub messages: Vec<MessageView>,
    pub input: String,
    /// False while a turn is outstanding.
    pub send_enabled: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub sender: Sender,
    pub style_class: &'static str,
    pub text: String,
    pub link: Option<String>,
    pub placeholder: bool,
}
