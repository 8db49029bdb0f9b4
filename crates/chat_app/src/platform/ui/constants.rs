use ratatui::style::{Color, Modifier, Style};

pub const TITLE: &str = "Sri Vasavi Engineering College · Assistant";
pub const INPUT_PROMPT: &str = "> ";
pub const HINTS_READY: &str =
    "Enter/Ctrl+S send · Ctrl+O open latest link · PgUp/PgDn scroll · Esc quit";
pub const HINTS_AWAITING: &str = "Waiting for reply... · Ctrl+O open latest link · Esc quit";

pub const USER_PREFIX: &str = "You: ";
pub const AI_PREFIX: &str = "Assistant: ";
/// Spaces a tab in backend text expands to.
pub const TAB_WIDTH: usize = 4;

pub const SCROLL_STEP: usize = 5;

pub const STYLE_TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const STYLE_USER: Style = Style::new().fg(Color::Green);
pub const STYLE_AI: Style = Style::new().fg(Color::White);
pub const STYLE_PLACEHOLDER: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::ITALIC);
pub const STYLE_LINK: Style = Style::new()
    .fg(Color::Blue)
    .add_modifier(Modifier::UNDERLINED);
pub const STYLE_HREF: Style = Style::new().fg(Color::DarkGray);
pub const STYLE_HINT: Style = Style::new().fg(Color::DarkGray);
