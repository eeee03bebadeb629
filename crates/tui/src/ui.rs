use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use relaychat_conversations::{Align, EntryView, Tone, EMPTY_HINT, EMPTY_TITLE};

use crate::app::App;

const INPUT_PLACEHOLDER: &str =
    "Type your message here... (Enter to send, Alt+Enter for new line)";

const SPINNER: [&str; 3] = ["●∙∙", "∙●∙", "∙∙●"];

#[mutants::skip] // Pure layout, exercised manually
pub fn render(app: &App, frame: &mut Frame) {
    let banner_height = if app.session.error_banner().is_some() { 3 } else { 0 };

    let [header_area, chat_area, banner_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(banner_height),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    if let Some(banner) = app.session.error_banner() {
        let widget = Paragraph::new(format!("⚠ {}", banner))
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(widget, banner_area);
    }
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

#[mutants::skip]
fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" AI Chat Assistant ", Style::default().bold()),
        Span::styled("● ", Style::default().fg(Color::Green)),
        Span::styled(
            format!("Online via {}", app.relay_url),
            Style::default().fg(Color::Gray),
        ),
    ];
    if app.session.can_clear() {
        spans.push(Span::styled(
            "   Ctrl+L clear chat",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Blue));
    frame.render_widget(header, area);
}

#[mutants::skip]
fn render_chat(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let view = app.session.view();

    if view.is_empty() && !app.session.is_awaiting() {
        let placeholder = Paragraph::new(Text::from(vec![
            Line::default(),
            Line::from(Span::styled(EMPTY_TITLE, Style::default().bold())),
            Line::from(Span::styled(EMPTY_HINT, Style::default().fg(Color::DarkGray))),
        ]))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let lines: Vec<Line> = view
        .entries()
        .flat_map(|entry| bubble_lines(&entry, app.animation_frame))
        .collect();

    // Measure before the block is attached so borders are not counted
    let chat = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total_rows = chat.line_count(area.width.saturating_sub(2));
    let scroll = tail_scroll(
        total_rows,
        area.height.saturating_sub(2),
        app.scroll_from_bottom,
    );

    frame.render_widget(chat.block(block).scroll((scroll, 0)), area);
}

#[mutants::skip]
fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let awaiting = app.session.is_awaiting();
    let (title, border) = if awaiting {
        (" Sending... ", Color::DarkGray)
    } else {
        (" Message ", Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    let style = if awaiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let input = app.session.input();
    if input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(placeholder, area);
        if !awaiting {
            frame.set_cursor_position(Position::new(area.x + 1, area.y + 1));
        }
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let rows = input_rows(input, inner_width);
    let (col, row) = input_cursor(&rows, inner_width);
    let scroll = row.saturating_add(1).saturating_sub(area.height.saturating_sub(2));

    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    let widget = Paragraph::new(lines)
        .block(block)
        .style(style)
        .scroll((scroll, 0));
    frame.render_widget(widget, area);

    if !awaiting {
        let x = area.x.saturating_add(1).saturating_add(col);
        let y = area.y.saturating_add(1).saturating_add(row.saturating_sub(scroll));
        frame.set_cursor_position(Position::new(x, y));
    }
}

#[mutants::skip]
fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let content = match app.notice() {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            " Enter send · Alt+Enter newline · PgUp/PgDn scroll · Esc quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(content), area);
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::User => Style::default().fg(Color::Cyan),
        Tone::Assistant => Style::default(),
        Tone::Error => Style::default().fg(Color::Red),
        Tone::Thinking => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

fn speaker(tone: Tone) -> &'static str {
    match tone {
        Tone::User => "You",
        Tone::Assistant | Tone::Thinking => "AI",
        Tone::Error => "Error",
    }
}

/// Lines for one bubble: a speaker/time heading, the text, and a spacer
fn bubble_lines<'a>(entry: &EntryView<'a>, animation_frame: u8) -> Vec<Line<'a>> {
    let alignment = match entry.align() {
        Align::Left => Alignment::Left,
        Align::Right => Alignment::Right,
    };
    let style = tone_style(entry.tone);

    let heading = match &entry.time_label {
        Some(label) => format!("{} · {}", speaker(entry.tone), label),
        None => speaker(entry.tone).to_string(),
    };

    let mut lines = vec![Line::from(Span::styled(
        heading,
        style.add_modifier(Modifier::BOLD),
    ))
    .alignment(alignment)];

    if entry.tone == Tone::Thinking {
        let dots = SPINNER[usize::from(animation_frame) % SPINNER.len()];
        lines.push(
            Line::from(Span::styled(format!("{} {}", dots, entry.text), style)).alignment(alignment),
        );
    } else {
        lines.extend(
            entry
                .text
                .split('\n')
                .map(|line| Line::from(Span::styled(line, style)).alignment(alignment)),
        );
    }

    lines.push(Line::default());
    lines
}

/// First visible row that keeps the view `from_bottom` rows above the tail
fn tail_scroll(total_rows: usize, viewport: u16, from_bottom: u16) -> u16 {
    let total = u16::try_from(total_rows).unwrap_or(u16::MAX);
    total.saturating_sub(viewport).saturating_sub(from_bottom)
}

/// Input text hard-wrapped at `width` columns, one entry per screen row
fn input_rows(input: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    input
        .split('\n')
        .flat_map(|line| {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                vec![String::new()]
            } else {
                chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
            }
        })
        .collect()
}

/// Cursor (column, row) after the last character of `rows`
///
/// A full last row pushes the cursor onto the next row.
fn input_cursor(rows: &[String], width: u16) -> (u16, u16) {
    let row = u16::try_from(rows.len().saturating_sub(1)).unwrap_or(u16::MAX);
    let col = rows
        .last()
        .map_or(0, |last| u16::try_from(last.chars().count()).unwrap_or(u16::MAX));
    if col >= width.max(1) {
        (0, row.saturating_add(1))
    } else {
        (col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use relaychat_conversations::{MockRelayClient, SubmitOutcome, THINKING_TEXT};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn entry(tone: Tone, text: &'static str, label: Option<&str>) -> EntryView<'static> {
        EntryView {
            key: 0,
            text,
            tone,
            time_label: label.map(str::to_string),
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn new_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Arc::new(MockRelayClient::new()), tx, String::new())
    }

    /// Send `message` and leave the session awaiting the reply
    fn begin(app: &mut App, message: &str) -> relaychat_conversations::PendingRequest {
        app.session.set_input(message);
        match app.session.begin_submit() {
            SubmitOutcome::Sent(pending) => pending,
            other => panic!("Expected Sent, got {:?}", other),
        }
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_user_bubble_is_right_aligned_with_time() {
        let lines = bubble_lines(&entry(Tone::User, "hi there", Some("09:41")), 0);

        assert_eq!(plain(&lines[0]), "You · 09:41");
        assert_eq!(plain(&lines[1]), "hi there");
        assert_eq!(lines[1].alignment, Some(Alignment::Right));
        assert_eq!(plain(lines.last().unwrap()), "");
    }

    #[test]
    fn test_multiline_text_splits_into_lines() {
        let lines = bubble_lines(&entry(Tone::Assistant, "one\ntwo", Some("10:00")), 0);
        assert_eq!(lines.len(), 4);
        assert_eq!(plain(&lines[2]), "two");
        assert_eq!(lines[2].alignment, Some(Alignment::Left));
    }

    #[test]
    fn test_thinking_bubble_animates() {
        let e = entry(Tone::Thinking, "AI is thinking...", None);
        let a = plain(&bubble_lines(&e, 0)[1]);
        let b = plain(&bubble_lines(&e, 1)[1]);
        assert_ne!(a, b);
        assert!(a.ends_with("AI is thinking..."));
        assert_eq!(plain(&bubble_lines(&e, 0)[0]), "AI");
    }

    #[test]
    fn test_error_bubble_heading() {
        let lines = bubble_lines(&entry(Tone::Error, "Sorry", Some("08:00")), 0);
        assert_eq!(plain(&lines[0]), "Error · 08:00");
    }

    #[test]
    fn test_tail_scroll() {
        assert_eq!(tail_scroll(30, 10, 0), 20);
        assert_eq!(tail_scroll(30, 10, 5), 15);
        assert_eq!(tail_scroll(30, 10, 50), 0);
        assert_eq!(tail_scroll(4, 10, 0), 0);
    }

    #[test]
    fn test_word_wrapped_reply_tail_is_visible() {
        let mut app = new_app();
        let pending = begin(&mut app, "hi");
        let reply = format!("{}ZZEND", "a bbbbbbbbbb c\n".repeat(10));
        app.session.settle(pending, Ok(reply));

        // Word wrap needs three rows per "a bbbbbbbbbb c" at this width
        let screen = draw(&app, 12, 20);
        assert!(screen.contains("ZZEND"), "newest line not shown:\n{}", screen);
    }

    #[test]
    fn test_thinking_row_visible_below_long_history() {
        let mut app = new_app();
        let pending = begin(&mut app, "hi");
        app.session
            .settle(pending, Ok("word ".repeat(60).trim_end().to_string()));
        begin(&mut app, "again");

        let screen = draw(&app, 14, 20);
        assert!(screen.contains("thinking"), "{} missing:\n{}", THINKING_TEXT, screen);
    }

    #[test]
    fn test_input_rows_wrap_hard_and_keep_blank_lines() {
        assert_eq!(input_rows("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(input_rows("a\n\nb", 4), vec!["a", "", "b"]);
        assert_eq!(input_rows("", 4), vec![""]);
    }

    #[test]
    fn test_input_cursor_follows_last_row() {
        assert_eq!(input_cursor(&input_rows("ab\ncd", 4), 4), (2, 1));
        // A full row moves the cursor to the start of the next one
        assert_eq!(input_cursor(&input_rows("abcd", 4), 4), (0, 1));
    }

    #[test]
    fn test_multiline_input_scrolls_to_cursor() {
        let mut app = new_app();
        app.session.set_input("l1\nl2\nl3\nl4\nl5");

        // Input box shows three rows, so the first two scroll away
        let screen = draw(&app, 40, 20);
        assert!(screen.contains("l5"), "last input line hidden:\n{}", screen);
        assert!(screen.contains("l3"));
        assert!(!screen.contains("l1"));
    }
}
