mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Screen};
use crate::engine::Scheduler;

pub fn render<S: Scheduler>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match (app.screen, app.engine()) {
        (Screen::Quiz, Some(engine)) => quiz::render(frame, area, engine),
        (Screen::Result, Some(engine)) => result::render(frame, area, engine, app.result_scroll()),
        _ => welcome::render(frame, area, app.total_questions(), app.config()),
    }
}
