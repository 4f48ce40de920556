use tracing::{debug, warn};

use super::error::SourceError;

pub const NO_ADAPTERS: &str = "No adapters";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Ethernet,
    Wireless,
    Loopback,
    Other,
}

impl AdapterKind {
    /// Only wired and wireless adapters are listed.
    pub fn is_listed(self) -> bool {
        matches!(self, AdapterKind::Ethernet | AdapterKind::Wireless)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterEntry {
    pub description: String,
    pub kind: AdapterKind,
}

/// The OS adapter table, read in two phases: ask for the buffer size, then
/// fill a buffer of exactly that size.
pub trait AdapterTable {
    /// Bytes needed to hold the table; zero when there are no adapters.
    fn required_len(&mut self) -> Result<usize, SourceError>;
    /// Fills a buffer of `len` bytes and decodes it. The buffer is owned by
    /// the call and released when it returns.
    fn fill(&mut self, len: usize) -> Result<Vec<AdapterEntry>, SourceError>;
}

/// Comma-joined descriptions of the active wired/wireless adapters.
///
/// A failed or empty size query yields [`NO_ADAPTERS`]; a failed fill
/// yields [`UNKNOWN`].
pub fn active_adapters<T: AdapterTable + ?Sized>(table: &mut T) -> String {
    let len = match table.required_len() {
        Ok(0) => return NO_ADAPTERS.to_string(),
        Ok(len) => len,
        Err(err) => {
            debug!(error = %err, "adapter table size query failed");
            return NO_ADAPTERS.to_string();
        }
    };

    let entries = match table.fill(len) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, len, "adapter table read failed");
            return UNKNOWN.to_string();
        }
    };

    let names: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.kind.is_listed())
        .map(|entry| entry.description.trim())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        NO_ADAPTERS.to_string()
    } else {
        names.join(", ")
    }
}
