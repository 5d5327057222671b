use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::engine::{AnswerResult, QuizEngine, Scheduler, Summary, Tier};

const QUESTION_PREVIEW_LENGTH: usize = 60;
const EXPLANATION_INDENT: &str = "     ";

pub fn render<S: Scheduler>(frame: &mut Frame, area: Rect, engine: &QuizEngine<S>, scroll: usize) {
    let Some(summary) = engine.summary() else {
        return;
    };
    let tier_color = tier_color(summary.tier);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &summary, tier_color);
    render_score_gauge(frame, chunks[2], &summary, tier_color);
    render_explanations(frame, chunks[3], &summary.results, scroll);
    render_controls(frame, chunks[4]);
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Excellent => Color::Green,
        Tier::Good => Color::Yellow,
        Tier::NeedsImprovement => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, summary: &Summary, color: Color) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETED",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}", summary.score, summary.total),
            Style::default().fg(color).bold(),
        )),
        Line::from(Span::styled(summary.tier.message(), Style::default().fg(color))),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_score_gauge(frame: &mut Frame, area: Rect, summary: &Summary, color: Color) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .percent(summary.percentage.min(100) as u16)
        .label(format!("{}% Correct", summary.percentage));
    frame.render_widget(gauge, area);
}

fn render_explanations(frame: &mut Frame, area: Rect, results: &[AnswerResult], scroll: usize) {
    // One column of padding on each side.
    let width = area.width.saturating_sub(2) as usize;
    let entries: Vec<Vec<Line>> = results
        .iter()
        .enumerate()
        .map(|(index, result)| entry_lines(index, result, width))
        .collect();
    let offset = scroll_offset(&entries, scroll);

    let widget = Paragraph::new(entries.concat())
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset, 0));
    frame.render_widget(widget, area);
}

/// Rows for one result. The explanation is wrapped here rather than by the
/// paragraph so the row count per entry is known when scrolling.
fn entry_lines(index: usize, result: &AnswerResult, width: usize) -> Vec<Line<'static>> {
    let (symbol, color) = if result.is_correct {
        ("+", Color::Green)
    } else {
        ("-", Color::Red)
    };

    let answer = match result.your_answer {
        Some(option) => result.options[option].clone(),
        None => "no answer".to_string(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(truncate_question(&result.prompt), Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::raw(EXPLANATION_INDENT),
            Span::styled(format!("you: {}", answer), Style::default().fg(color)),
            Span::styled(
                format!("  ·  answer: {}", result.options[result.correct_answer]),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let text_width = width.saturating_sub(EXPLANATION_INDENT.len());
    lines.extend(wrap_text(&result.explanation, text_width).into_iter().map(|row| {
        Line::from(Span::styled(
            format!("{}{}", EXPLANATION_INDENT, row),
            Style::default().fg(Color::DarkGray),
        ))
    }));
    lines
}

/// Row at which the `scroll`-th entry starts.
fn scroll_offset(entries: &[Vec<Line>], scroll: usize) -> u16 {
    let rows: usize = entries.iter().take(scroll).map(Vec::len).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Greedy word wrap. Words longer than `width` are split. Always returns
/// at least one row.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        if row_len > 0 && row_len + 1 + chars.len() > width {
            rows.push(std::mem::take(&mut row));
            row_len = 0;
        }
        while chars.len() > width {
            if row_len > 0 {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            rows.push(chars.drain(..width).collect());
        }
        if chars.is_empty() {
            continue;
        }
        if row_len > 0 {
            row.push(' ');
            row_len += 1;
        }
        row_len += chars.len();
        row.extend(chars);
    }

    if row_len > 0 || rows.is_empty() {
        rows.push(row);
    }
    rows
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r try again  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
