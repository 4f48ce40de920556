use tracing::{debug, debug_span};

use super::HostSources;
use super::cpu::{CpuTracker, MemoryUsage};
use super::identity::read_identity;
use super::network::active_adapters;
use super::snapshot::{InitialUpdate, MetricsUpdate};
use super::storage::query_disk_inventory;
use super::volumes::{VolumeRecord, enumerate_volumes};

/// Runs the extractors against the host. Owns the only state that survives
/// between polls: the CPU delta tracker.
pub struct Collector<S> {
    sources: S,
    cpu: CpuTracker,
    shell_override: Option<String>,
}

impl<S: HostSources> Collector<S> {
    pub fn new(sources: S) -> Self {
        Collector {
            sources,
            cpu: CpuTracker::new(),
            shell_override: None,
        }
    }

    pub fn with_shell_override(mut self, shell: Option<String>) -> Self {
        self.shell_override = shell;
        self
    }

    pub fn cpu_tracker(&self) -> &CpuTracker {
        &self.cpu
    }

    /// Identity, static hardware, volumes and memory. The CPU tracker is left
    /// unseeded; the first slow cycle seeds it and reports no percentage.
    pub fn initial_pass(&mut self) -> InitialUpdate {
        let _span = debug_span!("collector.initial_pass").entered();

        let identity = read_identity(&self.sources, self.shell_override.as_deref());
        let volumes = self.volumes();
        let memory = self.memory();

        InitialUpdate {
            identity,
            volumes,
            memory,
        }
    }

    /// One slow cycle: volumes, CPU delta, memory, storage hardware,
    /// network adapters, in that order.
    pub fn metrics_cycle(&mut self) -> MetricsUpdate {
        let _span = debug_span!("collector.metrics_cycle").entered();

        let volumes = self.volumes();
        let cpu_percent = self.cpu_percent();
        let memory = self.memory();
        let storage_hardware = query_disk_inventory(&self.sources);
        let network = active_adapters(&mut self.sources);

        MetricsUpdate {
            volumes,
            cpu_percent,
            memory,
            storage_hardware,
            network,
        }
    }

    fn volumes(&mut self) -> Vec<VolumeRecord> {
        enumerate_volumes(&mut self.sources)
    }

    fn cpu_percent(&mut self) -> Option<u8> {
        match self.sources.cpu_times() {
            Ok(times) => self.cpu.sample(times),
            Err(err) => {
                debug!(error = %err, "cpu times unavailable");
                None
            }
        }
    }

    fn memory(&mut self) -> Option<MemoryUsage> {
        match self.sources.memory_status() {
            Ok(status) => Some(MemoryUsage::from_status(status)),
            Err(err) => {
                debug!(error = %err, "memory status unavailable");
                None
            }
        }
    }
}
