use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::config::QuizConfig;

pub fn render(frame: &mut Frame, area: Rect, total_questions: usize, config: &QuizConfig) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Fill(1),
    ])
    .split(area);

    let details = format!(
        "{} Questions · {}s per question",
        total_questions, config.question_time_limit_secs
    );

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "ENVIRONMENTAL QUIZ",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(details, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
