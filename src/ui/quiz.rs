use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::engine::{QuizEngine, Scheduler};
use crate::models::Question;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render<S: Scheduler>(frame: &mut Frame, area: Rect, engine: &QuizEngine<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let question = engine.current_question();

    render_header(frame, chunks[0], engine);
    render_progress(frame, chunks[1], engine);
    render_question_text(frame, chunks[2], &question.prompt);
    render_options(frame, chunks[3], question, engine);
    if let Some(correct) = engine.last_answer_correct() {
        render_feedback(frame, chunks[4], question, correct, engine.state().time_remaining());
    }
    render_score(frame, chunks[5], engine);
    render_controls(frame, chunks[6], engine.state().is_revealed());
}

fn render_header<S: Scheduler>(frame: &mut Frame, area: Rect, engine: &QuizEngine<S>) {
    let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let counter = format!(
        "Question {} of {}",
        engine.state().current_index() + 1,
        engine.questions().len()
    );
    frame.render_widget(Paragraph::new(counter).fg(Color::DarkGray), left);

    let timer_style = if engine.is_time_low() {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let timer = Paragraph::new(format!("{}s", engine.state().time_remaining()))
        .alignment(Alignment::Right)
        .style(timer_style);
    frame.render_widget(timer, right);
}

fn render_progress<S: Scheduler>(frame: &mut Frame, area: Rect, engine: &QuizEngine<S>) {
    let ratio = engine.state().current_index() as f64 / engine.questions().len() as f64;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options<S: Scheduler>(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    engine: &QuizEngine<S>,
) {
    let revealed = engine.state().is_revealed();
    let selected = if revealed {
        engine.state().last_answer().flatten()
    } else {
        engine.state().selected_option()
    };

    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = selected == Some(index);
        let (style, marker) = if revealed && index == question.correct_option {
            (Style::default().fg(Color::Green).bold(), "✓")
        } else if revealed && is_selected {
            (Style::default().fg(Color::Red).bold(), "✗")
        } else if is_selected {
            (Style::default().fg(Color::Cyan).bold(), ">")
        } else {
            (Style::default().fg(Color::Gray), " ")
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    correct: bool,
    time_remaining: u32,
) {
    let (title, color) = match (correct, time_remaining) {
        (true, _) => ("Correct!", Color::Green),
        (false, 0) => ("Time's up!", Color::Red),
        (false, _) => ("Incorrect", Color::Red),
    };

    let widget = Paragraph::new(question.explanation.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::Gray)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(color)
                .title(Span::styled(title, Style::default().fg(color).bold()))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_score<S: Scheduler>(frame: &mut Frame, area: Rect, engine: &QuizEngine<S>) {
    let score = format!(
        "Current score: {}/{}",
        engine.score(),
        engine.state().answered_count()
    );
    let widget = Paragraph::new(score)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, revealed: bool) {
    let hint = if revealed {
        "r restart  ·  q quit"
    } else {
        "j/k or 1-4 choose  ·  enter submit  ·  r restart  ·  q quit"
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
