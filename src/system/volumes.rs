use serde::Serialize;
use tracing::debug;

use super::cpu::percent_of;
use super::error::SourceError;
use crate::format::format_gib;

const UNKNOWN_FS: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeCapacity {
    pub total_bytes: u64,
    pub free_bytes: u64,
    /// Filesystem name, `None` when the volume information query failed.
    pub fstype: Option<String>,
}

pub trait VolumeSource {
    /// Labels of every mounted volume, in enumeration order.
    fn present_volumes(&mut self) -> Result<Vec<String>, SourceError>;
    fn capacity(&mut self, volume: &str) -> Result<VolumeCapacity, SourceError>;
}

/// One row of the volume list. Field names are the keys the presentation
/// layer reads (`drive`, `total`, `used`, `percent`, `fstype`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeRecord {
    pub drive: String,
    /// GiB, one decimal.
    pub total: String,
    /// GiB, one decimal.
    pub used: String,
    pub percent: u8,
    pub fstype: String,
}

impl VolumeRecord {
    pub fn from_capacity(drive: &str, capacity: &VolumeCapacity) -> Self {
        let used = capacity.total_bytes.saturating_sub(capacity.free_bytes);
        VolumeRecord {
            drive: drive.to_string(),
            total: format_gib(capacity.total_bytes),
            used: format_gib(used),
            percent: percent_of(used, capacity.total_bytes),
            fstype: capacity
                .fstype
                .clone()
                .filter(|fs| !fs.is_empty())
                .unwrap_or_else(|| UNKNOWN_FS.to_string()),
        }
    }
}

/// Expands a drive-presence bitmask (bit 0 = `A:`) into drive labels.
pub fn drive_letters(mask: u32) -> Vec<String> {
    (0..26u8)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| format!("{}:", (b'A' + bit) as char))
        .collect()
}

/// Rebuilds the full volume list. Volumes whose capacity query fails are
/// left out rather than reported as empty.
pub fn enumerate_volumes<S: VolumeSource + ?Sized>(source: &mut S) -> Vec<VolumeRecord> {
    let volumes = match source.present_volumes() {
        Ok(volumes) => volumes,
        Err(err) => {
            debug!(error = %err, "volume enumeration failed");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(volumes.len());
    for volume in volumes {
        match source.capacity(&volume) {
            Ok(capacity) => records.push(VolumeRecord::from_capacity(&volume, &capacity)),
            Err(err) => debug!(volume = %volume, error = %err, "skipping volume"),
        }
    }
    records
}
