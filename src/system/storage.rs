//! Physical disk inventory from the host's management/instrumentation
//! service.
//!
//! The query is a strictly ordered session: initialize, set up security,
//! create a locator, connect to the hardware namespace, set the per-call
//! authorization, execute the query, then walk the result enumerator. Every
//! handle acquired along the way is an owned value whose `Drop` releases
//! it, so teardown happens in reverse acquisition order on every exit path:
//! enumerator, connection, locator, and finally the session itself.

use tracing::{debug, warn};

use super::error::SourceError;
use crate::format::format_bytes;

pub const INIT_FAILED: &str = "WMI init failed";
pub const NO_DISKS: &str = "No disks found";

pub const HARDWARE_NAMESPACE: &str = "ROOT\\CIMV2";
pub const DISK_QUERY: &str = "SELECT * FROM Win32_DiskDrive";

const SERIAL_LEN: usize = 20;
const UNKNOWN: &str = "Unknown";

/// Raw properties of one physical disk record, as the service reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskRecord {
    pub model: Option<String>,
    /// Byte count as a decimal string.
    pub size: Option<String>,
    pub interface: Option<String>,
    pub serial: Option<String>,
}

impl DiskRecord {
    /// `"<model> - <size> (<interface>) S/N: <serial>"`; the serial suffix is
    /// omitted when the record has none.
    pub fn summary_line(&self) -> String {
        let model = non_empty(self.model.as_deref()).unwrap_or(UNKNOWN);
        let interface = non_empty(self.interface.as_deref()).unwrap_or(UNKNOWN);
        let size = self
            .size
            .as_deref()
            .and_then(parse_size)
            .map(format_bytes)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let mut line = format!("{model} - {size} ({interface})");
        if let Some(serial) = non_empty(self.serial.as_deref()) {
            let serial: String = serial.chars().take(SERIAL_LEN).collect();
            line.push_str(" S/N: ");
            line.push_str(&serial);
        }
        line
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses the numeric-string size field; non-numeric or non-positive is `None`.
fn parse_size(raw: &str) -> Option<u64> {
    match raw.trim().parse::<i128>() {
        Ok(bytes) if bytes > 0 => u64::try_from(bytes).ok(),
        _ => None,
    }
}

/// One step per protocol stage. Handle types release themselves on drop.
pub trait ManagementService {
    /// Threading-mode session; dropping it tears the session down.
    type Session;
    type Locator;
    type Connection;
    type Records;

    /// Stage 1. "Already initialized in a compatible mode" counts as success.
    fn initialize(&self) -> Result<Self::Session, SourceError>;
    /// Stage 2, best effort.
    fn initialize_security(&self, session: &Self::Session) -> Result<(), SourceError>;
    fn create_locator(&self, session: &Self::Session) -> Result<Self::Locator, SourceError>;
    fn connect(
        &self,
        locator: &Self::Locator,
        namespace: &str,
    ) -> Result<Self::Connection, SourceError>;
    fn set_call_authorization(&self, connection: &Self::Connection) -> Result<(), SourceError>;
    /// Forward-only, immediate-return enumerator over the query results.
    fn exec_query(
        &self,
        connection: &Self::Connection,
        query: &str,
    ) -> Result<Self::Records, SourceError>;
    /// Next record, or `Ok(None)` once the enumerator is exhausted.
    fn next_record(&self, records: &mut Self::Records) -> Result<Option<DiskRecord>, SourceError>;
}

/// Runs one full session and returns the inventory as one line per disk.
///
/// Yields [`INIT_FAILED`] when the session cannot start, and [`NO_DISKS`]
/// when nothing was collected. A failure after initialization keeps the
/// lines gathered so far.
pub fn query_disk_inventory<M: ManagementService + ?Sized>(service: &M) -> String {
    let _span = tracing::debug_span!("storage.query").entered();

    let session = match service.initialize() {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "instrumentation session init failed");
            return INIT_FAILED.to_string();
        }
    };

    if let Err(err) = service.initialize_security(&session) {
        debug!(error = %err, "security init failed, continuing without it");
    }

    let mut lines = Vec::new();
    if let Err(err) = collect_disk_lines(service, &session, &mut lines) {
        warn!(error = %err, collected = lines.len(), "disk inventory query failed");
    }
    drop(session);

    if lines.is_empty() {
        NO_DISKS.to_string()
    } else {
        lines.join("\n")
    }
}

fn collect_disk_lines<M: ManagementService + ?Sized>(
    service: &M,
    session: &M::Session,
    lines: &mut Vec<String>,
) -> Result<(), SourceError> {
    // Declaration order fixes release order: records, connection, locator.
    let locator = service.create_locator(session)?;
    let connection = service.connect(&locator, HARDWARE_NAMESPACE)?;
    service.set_call_authorization(&connection)?;
    let mut records = service.exec_query(&connection, DISK_QUERY)?;

    while let Some(record) = service.next_record(&mut records)? {
        lines.push(record.summary_line());
    }
    Ok(())
}
