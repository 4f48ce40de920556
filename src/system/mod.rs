pub mod collector;
pub mod cpu;
pub mod error;
pub mod identity;
pub mod network;
pub mod notify;
pub mod platform;
pub mod poller;
pub mod snapshot;
pub mod storage;
pub mod volumes;

pub use error::SourceError;

use cpu::CounterSource;
use identity::IdentitySource;
use network::AdapterTable;
use storage::ManagementService;
use volumes::VolumeSource;

/// Everything the collector reads from the host, one trait per OS subsystem.
pub trait HostSources:
    IdentitySource + CounterSource + VolumeSource + AdapterTable + ManagementService
{
}

impl<T> HostSources for T where
    T: IdentitySource + CounterSource + VolumeSource + AdapterTable + ManagementService
{
}
