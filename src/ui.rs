use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ChatMessage, ChatRole, InputMode};
use crate::linkify::{linkify, Segment};

const AVATAR: &str = "◉";
const EMPTY_HINT: &str = "Send a message to start the conversation...";

pub fn render(app: &mut App, frame: &mut Frame) {
    let [chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // Store chat dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_chat(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" causerie — {} ", app.server_url));

    let chat_text = if app.messages.is_empty() && !app.loading {
        Text::from(Span::styled(EMPTY_HINT, Style::default().fg(Color::DarkGray)))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for (idx, msg) in app.messages.iter().enumerate() {
            let selected = app.input_mode == InputMode::Normal && app.selected_msg == Some(idx);
            let copied = app.copied_at.map(|(i, _)| i == idx).unwrap_or(false);
            lines.extend(message_lines(msg, selected, copied));
        }

        if app.loading {
            lines.extend(loading_lines(app.animation_frame));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

/// Lay out one message bubble: a role label line, the content lines, and a
/// blank separator. User bubbles sit on the right; Assistant bubbles sit on
/// the left and carry the avatar glyph.
pub fn message_lines(msg: &ChatMessage, selected: bool, copied: bool) -> Vec<Line<'static>> {
    let (label, label_color, alignment) = match msg.role {
        ChatRole::User => ("You".to_string(), Color::Cyan, Alignment::Right),
        ChatRole::Assistant => (format!("{AVATAR} Assistant"), Color::Yellow, Alignment::Left),
    };

    let mut label_style = Style::default().fg(label_color).add_modifier(Modifier::BOLD);
    if selected {
        label_style = label_style.add_modifier(Modifier::REVERSED);
    }

    let mut label_spans = vec![Span::styled(label, label_style)];
    if copied {
        label_spans.push(Span::styled(
            "  copied ✓",
            Style::default().fg(Color::Green),
        ));
    }

    let mut lines = vec![Line::from(label_spans).alignment(alignment)];

    for raw in msg.content.lines() {
        lines.push(Line::from(content_spans(raw)).alignment(alignment));
    }

    lines.push(Line::default());
    lines
}

// Bare URLs render underlined so they stand apart from the surrounding text;
// the visible token stays exactly as written.
fn content_spans(raw: &str) -> Vec<Span<'static>> {
    linkify(raw)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::raw(text),
            Segment::Link { text, .. } => Span::styled(
                text,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        })
        .collect()
}

/// The loading placeholder: an Assistant-styled bubble with an animated
/// ellipsis. Rendered iff the controller's `loading` flag is set.
pub fn loading_lines(animation_frame: u8) -> Vec<Line<'static>> {
    let dots = ".".repeat((animation_frame as usize) + 1);
    vec![
        Line::from(Span::styled(
            format!("{AVATAR} Assistant"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// What the copy action puts on the clipboard: the trimmed bubble content.
pub fn copy_text(msg: &ChatMessage) -> String {
    msg.content.trim().to_string()
}

fn render_input(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let input_border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Message (Enter to send) ");

    // Horizontal scrolling keeps the cursor visible in a one-line field
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let hints = match app.input_mode {
        InputMode::Editing => " Enter send · Esc browse · Ctrl+L clear · Ctrl+C quit",
        InputMode::Normal => " i compose · j/k select · c copy · Ctrl+L clear · q quit",
    };

    let footer = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Assistant,
            content: content.to_string(),
        }
    }

    #[test]
    fn user_bubble_is_right_aligned_without_avatar() {
        let lines = message_lines(&user("hello"), false, false);

        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(lines[0].spans[0].content, "You");
        assert_eq!(lines[1].spans[0].content, "hello");
        // Trailing blank separator
        assert!(lines.last().unwrap().spans.is_empty());
    }

    #[test]
    fn assistant_bubble_is_left_aligned_with_avatar() {
        let lines = message_lines(&assistant("hi there"), false, false);

        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        assert!(lines[0].spans[0].content.contains(AVATAR));
        assert_eq!(lines[1].spans[0].content, "hi there");
    }

    #[test]
    fn url_tokens_render_as_underlined_spans_in_surrounding_text() {
        let lines = message_lines(&assistant("check https://example.com/x please"), false, false);
        let spans = &lines[1].spans;

        assert_eq!(spans[0].content, "check ");
        assert_eq!(spans[1].content, "https://example.com/x");
        assert!(spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[2].content, " please");
        assert!(!spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn copied_flash_appends_an_acknowledgment_to_the_label() {
        let lines = message_lines(&user("hello"), false, true);
        assert!(lines[0].spans[1].content.contains("copied"));
    }

    #[test]
    fn loading_placeholder_is_assistant_styled_with_animated_ellipsis() {
        let lines = loading_lines(0);
        assert!(lines[0].spans[0].content.contains(AVATAR));
        assert_eq!(lines[1].spans[0].content, "Thinking.");

        let lines = loading_lines(2);
        assert_eq!(lines[1].spans[0].content, "Thinking...");
    }

    #[test]
    fn copy_text_is_the_trimmed_bubble_content() {
        assert_eq!(copy_text(&assistant("  hi there \n")), "hi there");
    }
}
