use chat_core::{AppViewModel, MessageView, Sender};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::constants::*;

/// Draws the whole screen. `scroll_offset` counts log rows up from the newest
/// entry; the returned value is that offset clamped to what the log can scroll.
pub fn draw(frame: &mut Frame, view: &AppViewModel, scroll_offset: usize) -> usize {
    let [header, log, input, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(TITLE).style(STYLE_TITLE), header);
    let offset = draw_log(frame, log, view, scroll_offset);
    draw_input(frame, input, &view.input);

    let hint_text = if view.send_enabled {
        HINTS_READY
    } else {
        HINTS_AWAITING
    };
    frame.render_widget(Paragraph::new(hint_text).style(STYLE_HINT), hints);
    offset
}

fn draw_log(frame: &mut Frame, area: Rect, view: &AppViewModel, scroll_offset: usize) -> usize {
    let log = Paragraph::new(Text::from(log_lines(view))).wrap(Wrap { trim: false });
    let max_scroll = log
        .line_count(area.width)
        .saturating_sub(usize::from(area.height));
    let offset = scroll_offset.min(max_scroll);
    let top = u16::try_from(max_scroll - offset).unwrap_or(u16::MAX);
    frame.render_widget(log.scroll((top, 0)), area);
    offset
}

fn draw_input(frame: &mut Frame, area: Rect, input: &str) {
    let prompt = Span::raw(INPUT_PROMPT);
    let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
    let [prompt_area, text_area] =
        Layout::horizontal([Constraint::Length(prompt_width), Constraint::Min(1)]).areas(area);

    let text = Line::from(sanitize(input).replace('\n', " "));
    let (skip, cursor) = input_window(text.width(), text_area.width);
    frame.render_widget(Paragraph::new(prompt), prompt_area);
    frame.render_widget(Paragraph::new(text).scroll((0, skip)), text_area);
    frame.set_cursor_position((text_area.x.saturating_add(cursor), text_area.y));
}

/// Columns to skip so the end of the input stays visible with room for the
/// cursor, and the cursor column within the text area.
fn input_window(text_width: usize, area_width: u16) -> (u16, u16) {
    let available = usize::from(area_width.saturating_sub(1));
    let skip = text_width.saturating_sub(available);
    let cursor = text_width - skip;
    (
        u16::try_from(skip).unwrap_or(u16::MAX),
        u16::try_from(cursor).unwrap_or(u16::MAX),
    )
}

/// Every message as styled lines, oldest first. Wrapping is left to the
/// paragraph.
fn log_lines(view: &AppViewModel) -> Vec<Line<'static>> {
    view.messages.iter().flat_map(message_lines).collect()
}

fn message_lines(message: &MessageView) -> Vec<Line<'static>> {
    let (prefix, sender_style) = match message.sender {
        Sender::User => (USER_PREFIX, STYLE_USER),
        Sender::Ai => (AI_PREFIX, STYLE_AI),
    };
    let body_style = if message.link.is_some() {
        STYLE_LINK
    } else if message.placeholder {
        STYLE_PLACEHOLDER
    } else {
        sender_style
    };
    let indent = " ".repeat(Span::raw(prefix).width());

    let mut lines: Vec<Line<'static>> = sanitize(&message.text)
        .split('\n')
        .enumerate()
        .map(|(index, row)| {
            let lead = if index == 0 {
                Span::styled(prefix, sender_style.add_modifier(Modifier::BOLD))
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![lead, Span::styled(row.to_string(), body_style)])
        })
        .collect();

    if let Some(href) = link_target(message) {
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled(href.to_string(), STYLE_HREF),
        ]));
    }
    lines
}

/// The message's link target, unless it contains characters the terminal
/// would act on.
fn link_target(message: &MessageView) -> Option<&str> {
    message
        .link
        .as_deref()
        .filter(|href| !href.chars().any(char::is_control))
}

/// Text safe to hand to the terminal: line breaks survive, tabs become
/// spaces, every other control character becomes U+FFFD.
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.replace("\r\n", "\n").chars() {
        match ch {
            '\n' => out.push('\n'),
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            ch if ch.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{update, AppState, Msg, ROUTE_LINK_LABEL, TYPING_PLACEHOLDER};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn state_with(inputs: &[&str]) -> AppState {
        let mut state = AppState::new();
        for input in inputs {
            state.add_message(*input, Sender::User);
        }
        state
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    /// Renders into an in-memory terminal; returns the rows and the clamped offset.
    fn screen(
        view: &AppViewModel,
        width: u16,
        height: u16,
        scroll_offset: usize,
    ) -> (Vec<String>, usize) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        let mut offset = 0;
        terminal
            .draw(|frame| offset = draw(frame, view, scroll_offset))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let rows = buffer
            .content
            .chunks(usize::from(width))
            .map(|row| {
                row.iter()
                    .map(|cell| cell.symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        (rows, offset)
    }

    fn after_route(map_url: &str) -> AppState {
        let (state, _) = update(AppState::new(), Msg::InputChanged("from a to b".to_string()));
        let (state, _) = update(state, Msg::SendClicked);
        let (state, _) = update(
            state,
            Msg::RouteCompleted {
                turn_id: 1,
                result: Ok(map_url.to_string()),
            },
        );
        state
    }

    #[test]
    fn senders_get_prefixes_and_styles() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("hello".to_string()));
        let (state, _) = update(state, Msg::SendClicked);
        let lines = log_lines(&state.view());

        assert_eq!(line_text(&lines[0]), "You: hello");
        assert_eq!(lines[0].spans[1].style, STYLE_USER);
        assert_eq!(line_text(&lines[1]), format!("Assistant: {TYPING_PLACEHOLDER}"));
        assert_eq!(lines[1].spans[1].style, STYLE_PLACEHOLDER);
    }

    #[test]
    fn route_link_shows_label_then_target() {
        let state = after_route("https://maps/x");
        let view = state.view();
        let lines = log_lines(&view);
        let [.., label, href] = lines.as_slice() else {
            panic!("expected label and target rows");
        };

        assert!(line_text(label).ends_with(ROUTE_LINK_LABEL));
        assert_eq!(label.spans[1].style, STYLE_LINK);
        assert_eq!(line_text(href).trim_start(), "https://maps/x");
        assert_eq!(link_target(view.messages.last().unwrap()), Some("https://maps/x"));
    }

    #[test]
    fn backend_control_characters_are_shown_inert() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("hi".to_string()));
        let (state, _) = update(state, Msg::SendClicked);
        let (state, _) = update(
            state,
            Msg::ChatCompleted {
                turn_id: 1,
                result: Ok("line one\r\nover\x1b[2J\tx".to_string()),
            },
        );
        let (state, _) = update(state, Msg::InputChanged("from a to b".to_string()));
        let (state, _) = update(state, Msg::SendClicked);
        let (state, _) = update(
            state,
            Msg::RouteCompleted {
                turn_id: 2,
                result: Ok("https://m/x\x1b\\\x1b[31mEVIL".to_string()),
            },
        );
        let view = state.view();
        let texts: Vec<String> = log_lines(&view).iter().map(line_text).collect();

        for text in &texts {
            assert!(!text.chars().any(char::is_control), "{text:?}");
        }
        assert!(texts.contains(&"Assistant: line one".to_string()));
        assert!(texts.contains(&"           over\u{fffd}[2J    x".to_string()));
        assert_eq!(link_target(view.messages.last().unwrap()), None);
        assert!(texts.last().unwrap().ends_with(ROUTE_LINK_LABEL));
    }

    #[test]
    fn sanitize_keeps_newlines_and_expands_tabs() {
        assert_eq!(sanitize("a\tb\nc"), "a    b\nc");
        assert_eq!(sanitize("a\rb\u{9b}c"), "a\u{fffd}b\u{fffd}c");
        assert_eq!(sanitize("日本語"), "日本語");
    }

    #[test]
    fn log_shows_newest_rows_and_scrolls_back() {
        let state = state_with(&["one", "two", "three", "four"]);
        let view = state.view();

        // Title, two log rows, input, hints.
        let (rows, offset) = screen(&view, 40, 5, 0);
        assert_eq!(offset, 0);
        assert_eq!(rows[0], TITLE);
        assert_eq!(rows[1..3], ["You: three", "You: four"]);

        let (rows, _) = screen(&view, 40, 5, 1);
        assert_eq!(rows[1..3], ["You: two", "You: three"]);

        let (rows, offset) = screen(&view, 40, 5, 99);
        assert_eq!(offset, 2);
        assert_eq!(rows[1], "You: one");
    }

    #[test]
    fn long_messages_wrap_into_scrollable_rows() {
        let state = state_with(&["alpha beta gamma delta epsilon"]);
        let (_, offset) = screen(&state.view(), 12, 5, 99);
        assert!(offset > 0);
    }

    #[test]
    fn input_row_keeps_the_tail() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("hello world".to_string()));
        let (rows, _) = screen(&state.view(), 10, 5, 0);
        assert_eq!(rows[3], "> o world");

        assert_eq!(input_window(11, 8), (4, 7));
        assert_eq!(input_window(0, 8), (0, 0));
    }

    #[test]
    fn hints_follow_send_availability() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("hi".to_string()));
        assert_eq!(screen(&state.view(), 200, 10, 0).0[9], HINTS_READY);
        let (state, _) = update(state, Msg::EnterPressed);
        assert_eq!(screen(&state.view(), 200, 10, 0).0[9], HINTS_AWAITING);
    }
}
