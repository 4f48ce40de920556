use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap};

use crate::format::truncate_unicode;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 9;

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

fn field<'a>(label: &'a str, value: &str, width: u16, theme: &Theme) -> Line<'a> {
    let room = usize::from(width).saturating_sub(LABEL_WIDTH + 1);
    Line::from(vec![
        Span::styled(
            format!("{label:<LABEL_WIDTH$}"),
            Style::default()
                .fg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_unicode(value, room),
            Style::default().fg(theme.text_primary),
        ),
    ])
}

/// Host identity: one labelled line per field.
pub fn render_system(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = panel(" System ", theme);
    let width = block.inner(area).width;
    let lines = vec![
        field("OS", snapshot.os_name(), width, theme),
        field("Kernel", snapshot.kernel(), width, theme),
        field("Uptime", snapshot.uptime(), width, theme),
        field("Shell", snapshot.shell(), width, theme),
        field("User", snapshot.username(), width, theme),
        field("Home", snapshot.home_dir(), width, theme),
        field("CPU", snapshot.cpu_model(), width, theme),
        field("GPU", snapshot.gpu(), width, theme),
        field("Display", snapshot.display(), width, theme),
        field("Memory", snapshot.memory_info(), width, theme),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_volumes(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let header = Row::new(["Drive", "Used", "Total", "Use%", "FS"]).style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );
    let rows = snapshot.disk_info().iter().map(|volume| {
        Row::new([
            volume.drive.clone(),
            format!("{} GB", volume.used),
            format!("{} GB", volume.total),
            format!("{}%", volume.percent),
            volume.fstype.clone(),
        ])
        .style(Style::default().fg(theme.load_color(volume.percent)))
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Min(4),
        ],
    )
    .header(header)
    .block(panel(" Volumes ", theme));
    frame.render_widget(table, area);
}

pub fn render_devices(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let mut lines = vec![Line::from(Span::styled(
        "Storage",
        Style::default()
            .fg(theme.pill_key_bg)
            .add_modifier(Modifier::BOLD),
    ))];
    let text = Style::default().fg(theme.text_primary);
    lines.extend(
        snapshot
            .storage_hardware()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), text))),
    );
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Network",
        Style::default()
            .fg(theme.pill_key_bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(snapshot.network().to_string(), text)));

    let paragraph = Paragraph::new(lines)
        .block(panel(" Devices ", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
