//! Drawing the chat window

use super::composer::Composer;
use crate::state_machine::{ChatState, Readiness, Speaker, Turn};
use chrono::Local;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const MAX_INPUT_LINES: usize = 5;

/// Everything needed to draw one frame
pub struct View<'a> {
    pub state: &'a ChatState,
    pub composer: &'a Composer,
    pub model: &'a str,
    pub tick: usize,
}

pub fn draw(frame: &mut Frame, view: &View) {
    let banner_height = if view.state.banner.is_some() { 3 } else { 0 };
    let input_lines = view.composer.line_count().clamp(1, MAX_INPUT_LINES);
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_INPUT_LINES
    let input_height = input_lines as u16 + 2;

    let [header, banner, messages, status, input] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(banner_height),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(input_height),
    ])
    .areas(frame.area());

    draw_header(frame, header, view.model);
    if let Some(text) = &view.state.banner {
        draw_banner(frame, banner, text);
    }
    draw_messages(frame, messages, view.state);
    draw_status(frame, status, view);
    draw_input(frame, input, view);
}

fn draw_header(frame: &mut Frame, area: Rect, model: &str) {
    let line = Line::from(vec![
        Span::styled(" Gemini Chat ", Style::new().bold().reversed()),
        Span::raw(" "),
        Span::styled(model.to_string(), Style::new().dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_banner(frame: &mut Frame, area: Rect, text: &str) {
    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Red))
        .title(" Error ");
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::new().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn turn_lines(turn: &Turn) -> Vec<Line<'static>> {
    let (label, style) = match turn.speaker() {
        Speaker::User => ("You", Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Speaker::Assistant => ("Gemini", Style::new().fg(Color::Green).add_modifier(Modifier::BOLD)),
    };
    let time = turn.created_at().with_timezone(&Local).format("%H:%M").to_string();

    let mut lines = vec![Line::from(vec![
        Span::styled(label, style),
        Span::styled(format!(" {time}"), Style::new().dim()),
    ])];
    lines.extend(turn.text().lines().map(|l| Line::raw(l.to_string())));
    lines.push(Line::default());
    lines
}

fn draw_messages(frame: &mut Frame, area: Rect, state: &ChatState) {
    let block = Block::new().borders(Borders::ALL).title(" Conversation ");
    let inner = block.inner(area);

    let lines: Vec<Line> = state.conversation.turns().iter().flat_map(turn_lines).collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Keep the newest turn in view; count rows with the same word wrap the
    // paragraph renders with
    let overflow = paragraph
        .line_count(inner.width)
        .saturating_sub(usize::from(inner.height));
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

    frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

fn draw_status(frame: &mut Frame, area: Rect, view: &View) {
    let line = match view.state.readiness {
        Readiness::Uninitialized | Readiness::Initializing => {
            Line::styled(" Connecting...", Style::new().dim())
        }
        Readiness::InitFailed => Line::styled(" Chat unavailable", Style::new().fg(Color::Red)),
        Readiness::Ready if view.state.busy => Line::styled(
            format!(" {} Gemini is thinking...", SPINNER[view.tick % SPINNER.len()]),
            Style::new().fg(Color::Yellow),
        ),
        Readiness::Ready => Line::styled(
            " Enter to send, Shift+Enter for a new line, Esc to quit",
            Style::new().dim(),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_input(frame: &mut Frame, area: Rect, view: &View) {
    let enabled = view.state.accepts_input();
    let border = if enabled {
        Style::new()
    } else {
        Style::new().dim()
    };
    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Message ");

    let text = view.composer.text();
    let paragraph = if text.is_empty() && !enabled {
        Paragraph::new(Line::styled("Input disabled", Style::new().dim()))
    } else {
        Paragraph::new(text.to_string())
    };

    let lines = view.composer.line_count();
    let scroll = u16::try_from(lines.saturating_sub(MAX_INPUT_LINES)).unwrap_or(u16::MAX);
    frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}
