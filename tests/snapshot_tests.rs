mod common;

use common::FakeHost;
use insta::assert_snapshot;
use sysdash::system::collector::Collector;
use sysdash::system::snapshot::Snapshot;

#[test]
fn headless_json_after_startup_and_one_cycle() {
    let mut collector = Collector::new(FakeHost::new());
    let mut snapshot = Snapshot::new();

    snapshot.apply_initial(collector.initial_pass());
    snapshot.apply_metrics(collector.metrics_cycle());

    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    assert_snapshot!(json, @r#"
    {
      "os_name": "Windows 11 Pro",
      "kernel": "NT 10.0.22631",
      "shell": "PowerShell",
      "uptime": "2 days, 75 mins",
      "username": "ada",
      "home_dir": "C:\\Users\\ada",
      "cpu_model": "AMD Ryzen 7 5800X 8-Core Processor",
      "gpu": "Generic GPU",
      "display": "2560x1440 @ 144 Hz",
      "cpu_percent": 0,
      "memory_percent": 75,
      "memory_total": 17179869184,
      "memory_used": 12884901888,
      "memory_info": "12.0 GB / 16.0 GB",
      "volumes": [
        {
          "drive": "C:",
          "total": "100.0",
          "used": "75.0",
          "percent": 75,
          "fstype": "NTFS"
        },
        {
          "drive": "D:",
          "total": "200.0",
          "used": "0.0",
          "percent": 0,
          "fstype": "Unknown"
        }
      ],
      "storage_hardware": "Samsung SSD 980 - 931.5 GB (SCSI)",
      "network": "Intel(R) Ethernet, Wi-Fi 6 AX201",
      "time": "Loading..."
    }
    "#);
}

#[test]
fn shell_override_replaces_detected_shell() {
    let mut collector =
        Collector::new(FakeHost::new()).with_shell_override(Some("pwsh".to_string()));
    let mut snapshot = Snapshot::new();

    snapshot.apply_initial(collector.initial_pass());

    assert_snapshot!(snapshot.shell(), @"pwsh");
}
