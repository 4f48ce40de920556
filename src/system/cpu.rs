use serde::Serialize;

use super::error::SourceError;
use crate::format::format_bytes;

/// Accumulated processor time since boot, in host ticks.
///
/// `kernel` includes `idle`, so `kernel + user` is the total elapsed time
/// across all cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub idle: u64,
    pub kernel: u64,
    pub user: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStatus {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

pub trait CounterSource {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError>;
    fn memory_status(&mut self) -> Result<MemoryStatus, SourceError>;
}

/// Turns two time-separated [`CpuTimes`] samples into a utilization
/// percentage. Owns the previous sample for the lifetime of the process.
#[derive(Debug, Default)]
pub struct CpuTracker {
    previous: Option<CpuTimes>,
    percent: u8,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `now` and returns the utilization since the previous sample.
    ///
    /// Returns `None` on the very first call (seed only) and when no time
    /// elapsed between samples; the last reported percentage is kept.
    pub fn sample(&mut self, now: CpuTimes) -> Option<u8> {
        let prev = self.previous.replace(now)?;

        let busy = now
            .kernel
            .saturating_add(now.user)
            .saturating_sub(prev.kernel.saturating_add(prev.user));
        if busy == 0 {
            return None;
        }
        let idle = now.idle.saturating_sub(prev.idle);
        let percent = 100.0 - (idle as f64 * 100.0 / busy as f64);
        self.percent = percent.round().clamp(0.0, 100.0) as u8;
        Some(self.percent)
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub percent: u8,
}

impl MemoryUsage {
    pub fn from_status(status: MemoryStatus) -> Self {
        let used = status.total_bytes.saturating_sub(status.available_bytes);
        MemoryUsage {
            total_bytes: status.total_bytes,
            used_bytes: used,
            percent: percent_of(used, status.total_bytes),
        }
    }

    /// "12.0 GB / 16.0 GB"
    pub fn summary(&self) -> String {
        format!(
            "{} / {}",
            format_bytes(self.used_bytes),
            format_bytes(self.total_bytes)
        )
    }
}

/// `round(part / whole * 100)` clamped to 0..=100; zero when `whole` is zero.
pub fn percent_of(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}
