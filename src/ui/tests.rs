use insta::assert_snapshot;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::system::cpu::MemoryUsage;
use crate::system::identity::Identity;
use crate::system::snapshot::{InitialUpdate, LOADING, MetricsUpdate, Snapshot};
use crate::system::volumes::VolumeRecord;
use crate::ui::theme::Theme;
use crate::ui::{draw, header, statusbar};

const GIB: u64 = 1024 * 1024 * 1024;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_snapshot() -> Snapshot {
    let memory = MemoryUsage {
        total_bytes: 16 * GIB,
        used_bytes: 8 * GIB,
        percent: 50,
    };
    let volume = VolumeRecord {
        drive: "C:".to_string(),
        total: "476.3".to_string(),
        used: "201.8".to_string(),
        percent: 42,
        fstype: "NTFS".to_string(),
    };

    let mut snapshot = Snapshot::new();
    snapshot.apply_initial(InitialUpdate {
        identity: Identity {
            os_name: "Windows 11 Pro".to_string(),
            kernel: "NT 10.0.22631".to_string(),
            shell: "PowerShell".to_string(),
            cpu_model: "AMD Ryzen 7 5800X 8-Core Processor".to_string(),
            gpu: "NVIDIA GeForce RTX 3070".to_string(),
            display: "2560x1440 @ 144 Hz".to_string(),
            username: "ada".to_string(),
            home_dir: "C:\\Users\\ada".to_string(),
            uptime: "2 days, 75 mins".to_string(),
        },
        volumes: vec![volume.clone()],
        memory: Some(memory),
    });
    snapshot.apply_metrics(MetricsUpdate {
        volumes: vec![volume],
        cpu_percent: Some(37),
        memory: Some(memory),
        storage_hardware: "Samsung SSD 980 - 931.5 GB (SCSI)".to_string(),
        network: "Intel(R) Ethernet, Wi-Fi 6 AX201".to_string(),
    });
    snapshot.set_time("12:34".to_string());
    snapshot
}

#[test]
fn statusbar_lists_quit_keys() {
    let output = render_to_string(40, 1, |frame| {
        statusbar::render(frame, Rect::new(0, 0, 40, 1), &Theme::default());
    });

    assert_snapshot!(output.trim(), @"q  Quit  Esc  Quit  Ctrl+C  Quit");
}

#[test]
fn header_shows_gauges_and_clock() {
    let snapshot = make_snapshot();
    let output = render_to_string(100, 3, |frame| {
        header::render(frame, Rect::new(0, 0, 100, 3), &snapshot, &Theme::default());
    });

    assert!(output.contains("sysdash"));
    assert!(output.contains("ada@Windows 11 Pro"));
    assert!(output.contains("12:34"));
    assert!(output.contains("37%"));
    assert!(output.contains("8.0 GB / 16.0 GB (50%)"));
}

#[test]
fn dashboard_before_first_update_shows_placeholders() {
    let snapshot = Snapshot::new();
    let output = render_to_string(100, 30, |frame| {
        draw(frame, &snapshot, &Theme::default());
    });

    assert!(output.contains(LOADING));
    assert!(output.contains("Volumes"));
    assert!(output.contains("0%"));
}

#[test]
fn dashboard_renders_every_panel() {
    let snapshot = make_snapshot();
    let output = render_to_string(100, 30, |frame| {
        draw(frame, &snapshot, &Theme::default());
    });

    assert!(output.contains("NT 10.0.22631"));
    assert!(output.contains("2 days, 75 mins"));
    assert!(output.contains("2560x1440 @ 144 Hz"));
    assert!(output.contains("201.8 GB"));
    assert!(output.contains("NTFS"));
    assert!(output.contains("Samsung SSD 980 - 931.5 GB (SCSI)"));
    assert!(output.contains("Intel(R) Ethernet, Wi-Fi 6 AX201"));
    assert!(!output.contains(LOADING));
}

#[test]
fn long_values_are_truncated_in_narrow_panels() {
    let snapshot = make_snapshot();
    let output = render_to_string(60, 30, |frame| {
        draw(frame, &snapshot, &Theme::default());
    });

    assert!(output.contains('\u{2026}'));
}
