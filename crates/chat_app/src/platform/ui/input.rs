use chat_core::Msg;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Msg(Msg),
    ScrollUp,
    ScrollDown,
    Quit,
}

/// Maps a key press to an action, given the text currently in the input line.
pub fn translate(key: &KeyEvent, current_input: &str) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('o') if ctrl => Some(Action::Msg(Msg::OpenLatestLink)),
        KeyCode::Char('s') if ctrl => Some(Action::Msg(Msg::SendClicked)),
        KeyCode::Char('u') if ctrl => edited(current_input, String::new()),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(ch) => {
            let mut text = current_input.to_string();
            text.push(ch);
            edited(current_input, text)
        }
        KeyCode::Backspace => {
            let mut text = current_input.to_string();
            text.pop();
            edited(current_input, text)
        }
        KeyCode::Enter => Some(Action::Msg(Msg::EnterPressed)),
        KeyCode::PageUp | KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::PageDown | KeyCode::Down => Some(Action::ScrollDown),
        _ => None,
    }
}

fn edited(before: &str, after: String) -> Option<Action> {
    (before != after).then_some(Action::Msg(Msg::InputChanged(after)))
}
