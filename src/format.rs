use std::fmt::Write;

use chrono::{DateTime, TimeZone};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Bytes as GiB with one decimal, no unit suffix.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / GIB)
}

pub fn format_uptime(seconds: u64) -> String {
    let minutes = seconds / 60;
    format!("{} days, {} mins", minutes / 1440, minutes % 1440)
}

/// Formats `now` with a strftime pattern, falling back to `%H:%M` when the
/// pattern is invalid.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_ok() {
        return out;
    }
    now.format(DEFAULT_CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn bytes_pick_the_largest_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn gib_has_one_decimal() {
        assert_eq!(format_gib(0), "0.0");
        assert_eq!(format_gib(1024 * 1024 * 1024), "1.0");
        assert_eq!(format_gib(255_953_203_200), "238.4");
    }

    #[test]
    fn uptime_splits_days_and_minutes() {
        assert_eq!(format_uptime(59), "0 days, 0 mins");
        assert_eq!(format_uptime(3 * 86_400 + 61 * 60 + 30), "3 days, 61 mins");
    }

    #[test]
    fn clock_uses_pattern() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap();
        assert_eq!(format_clock(&now, "%H:%M"), "07:05");
        assert_eq!(format_clock(&now, "%H:%M:%S"), "07:05:42");
    }

    #[test]
    fn invalid_clock_pattern_falls_back() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(format_clock(&now, "%Q"), "23:59");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("Intel(R) Ethernet", 8), "Intel(R\u{2026}");
    }
}
