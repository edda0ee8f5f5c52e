use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use klava::compare;
use klava::session::{Feedback, Phase};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.phase() {
            Phase::Idle => render_idle(area, buf),
            Phase::Typing | Phase::Paused => render_typing(self, area, buf),
            Phase::Finished => render_finished(self, area, buf),
        }
    }
}

fn render_idle(area: Rect, buf: &mut Buffer) {
    let chunks = centered_rows(area, 1);

    let banner = Paragraph::new(Span::styled(
        "Press Enter to start",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    banner.render(chunks[1], buf);

    render_hints(" (enter) start  (esc) quit ", chunks[2], buf);
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = bold.fg(Color::Green);
    let red_bold = bold.fg(Color::Red);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let underlined_dim_bold = dim_bold.add_modifier(Modifier::UNDERLINED);

    let target = app.session.target().unwrap_or_default();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_occupied_lines = if target.width() <= max_chars_per_line as usize {
        1
    } else {
        ((target.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(prompt_occupied_lines + 3) / 2),
                Constraint::Length(1), // status
                Constraint::Length(1), // timer
                Constraint::Length(prompt_occupied_lines),
                Constraint::Min(0),
                Constraint::Length(1), // hints
            ]
            .as_ref(),
        )
        .split(area);

    let (status_text, status_style) = if app.session.phase() == Phase::Paused {
        (
            "PAUSED (tab to continue)",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )
    } else if matches!(app.feedback, Some(Feedback::FixError)) {
        ("Fix the error!", red_bold)
    } else {
        ("Type this text:", Style::default())
    };
    Paragraph::new(Span::styled(status_text, status_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let timer = Paragraph::new(Span::styled(
        format!("{:.1}", app.session.elapsed_active_secs()),
        dim_bold,
    ))
    .alignment(Alignment::Center);
    timer.render(chunks[2], buf);

    // Overlay the typed input on the target: matched characters green,
    // mismatches red (showing what was actually typed), the cursor
    // underlined, the untyped remainder dim.
    let typed: Vec<char> = app.input.chars().collect();
    let mut spans = Vec::new();
    for (idx, expected) in target.chars().enumerate() {
        if let Some(&got) = typed.get(idx) {
            if compare::equivalent(expected, got) {
                spans.push(Span::styled(expected.to_string(), green_bold));
            } else {
                spans.push(Span::styled(printable(got), red_bold));
            }
        } else if idx == typed.len() {
            spans.push(Span::styled(expected.to_string(), underlined_dim_bold));
        } else {
            spans.push(Span::styled(expected.to_string(), dim_bold));
        }
    }
    for &got in typed.iter().skip(target.chars().count()) {
        spans.push(Span::styled(printable(got), red_bold));
    }

    let prompt = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    prompt.render(chunks[3], buf);

    let hints = if app.session.phase() == Phase::Paused {
        " (tab) continue  (ctrl-r) reset  (esc) quit "
    } else {
        " (enter) finish line  (tab) pause  (ctrl-r) reset  (esc) quit "
    };
    render_hints(hints, chunks[5], buf);
}

fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = centered_rows(area, 2);

    let message = match app.session.report() {
        Some(report) => format!(
            "You took {:.2} seconds. Typing speed: {:.2} characters per second",
            report.elapsed_secs, report.chars_per_sec
        ),
        None => String::new(),
    };
    let summary = Paragraph::new(Span::styled(
        message,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    summary.render(chunks[1], buf);

    render_hints(" (enter) go again  (ctrl-r) reset  (esc) quit ", chunks[2], buf);
}

fn centered_rows(area: Rect, body_lines: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(body_lines + 1) / 2),
                Constraint::Length(body_lines),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area)
}

fn render_hints(text: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn printable(c: char) -> String {
    match c {
        ' ' => "·".to_string(),
        '\n' => "⏎".to_string(),
        c => c.to_string(),
    }
}
