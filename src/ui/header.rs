use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_branding(frame, chunks[0], snapshot, theme);
    render_gauge(
        frame,
        chunks[1],
        " CPU ",
        snapshot.cpu_percent(),
        format!("{}%", snapshot.cpu_percent()),
        theme,
    );
    render_gauge(
        frame,
        chunks[2],
        " RAM ",
        snapshot.memory_percent(),
        format!("{} ({}%)", snapshot.memory_info(), snapshot.memory_percent()),
        theme,
    );
}

fn render_branding(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(
            " sysdash ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{}@{}", snapshot.username(), snapshot.os_name()),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            snapshot.time().to_string(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    percent: u8,
    label: String,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.load_color(percent))
                .bg(theme.gauge_unfilled),
        )
        .percent(u16::from(percent.min(100)))
        .label(label);

    frame.render_widget(gauge, area);
}
