pub mod header;
pub mod panels;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

/// Renders the whole dashboard from a snapshot. Reads only.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(body[1]);

    header::render(frame, chunks[0], snapshot, theme);
    panels::render_system(frame, body[0], snapshot, theme);
    panels::render_volumes(frame, right[0], snapshot, theme);
    panels::render_devices(frame, right[1], snapshot, theme);
    statusbar::render(frame, chunks[2], theme);
}

#[cfg(test)]
mod tests;
