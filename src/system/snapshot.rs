use serde::Serialize;

use super::cpu::MemoryUsage;
use super::identity::Identity;
use super::volumes::VolumeRecord;

pub const LOADING: &str = "Loading...";

/// Everything one slow cycle produced, applied to the snapshot in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsUpdate {
    pub volumes: Vec<VolumeRecord>,
    /// `None` keeps the previously reported percentage.
    pub cpu_percent: Option<u8>,
    /// `None` keeps the previous memory figures.
    pub memory: Option<MemoryUsage>,
    pub storage_hardware: String,
    pub network: String,
}

/// Result of the deferred startup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialUpdate {
    pub identity: Identity,
    pub volumes: Vec<VolumeRecord>,
    pub memory: Option<MemoryUsage>,
}

/// Latest known value of every metric. Readers only ever see it between
/// updates; each update replaces fields in place on the owning thread.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    os_name: String,
    kernel: String,
    shell: String,
    uptime: String,
    username: String,
    home_dir: String,
    cpu_model: String,
    gpu: String,
    display: String,
    cpu_percent: u8,
    memory_percent: u8,
    memory_total: u64,
    memory_used: u64,
    memory_info: String,
    volumes: Vec<VolumeRecord>,
    storage_hardware: String,
    network: String,
    time: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            os_name: LOADING.to_string(),
            kernel: LOADING.to_string(),
            shell: LOADING.to_string(),
            uptime: LOADING.to_string(),
            username: LOADING.to_string(),
            home_dir: LOADING.to_string(),
            cpu_model: LOADING.to_string(),
            gpu: LOADING.to_string(),
            display: LOADING.to_string(),
            cpu_percent: 0,
            memory_percent: 0,
            memory_total: 0,
            memory_used: 0,
            memory_info: LOADING.to_string(),
            volumes: Vec::new(),
            storage_hardware: LOADING.to_string(),
            network: LOADING.to_string(),
            time: LOADING.to_string(),
        }
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    pub fn kernel(&self) -> &str {
        &self.kernel
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn uptime(&self) -> &str {
        &self.uptime
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn home_dir(&self) -> &str {
        &self.home_dir
    }

    pub fn cpu_model(&self) -> &str {
        &self.cpu_model
    }

    pub fn gpu(&self) -> &str {
        &self.gpu
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn cpu_percent(&self) -> u8 {
        self.cpu_percent
    }

    pub fn memory_percent(&self) -> u8 {
        self.memory_percent
    }

    pub fn memory_total(&self) -> u64 {
        self.memory_total
    }

    pub fn memory_used(&self) -> u64 {
        self.memory_used
    }

    pub fn memory_info(&self) -> &str {
        &self.memory_info
    }

    /// Volume list in enumeration order.
    pub fn disk_info(&self) -> &[VolumeRecord] {
        &self.volumes
    }

    pub fn storage_hardware(&self) -> &str {
        &self.storage_hardware
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn apply_initial(&mut self, update: InitialUpdate) {
        let identity = update.identity;
        self.os_name = identity.os_name;
        self.kernel = identity.kernel;
        self.shell = identity.shell;
        self.uptime = identity.uptime;
        self.username = identity.username;
        self.home_dir = identity.home_dir;
        self.cpu_model = identity.cpu_model;
        self.gpu = identity.gpu;
        self.display = identity.display;
        self.volumes = update.volumes;
        if let Some(memory) = update.memory {
            self.set_memory(memory);
        }
    }

    pub fn apply_metrics(&mut self, update: MetricsUpdate) {
        self.volumes = update.volumes;
        if let Some(percent) = update.cpu_percent {
            self.cpu_percent = percent.min(100);
        }
        if let Some(memory) = update.memory {
            self.set_memory(memory);
        }
        self.storage_hardware = update.storage_hardware;
        self.network = update.network;
    }

    pub fn set_time(&mut self, time: String) {
        self.time = time;
    }

    fn set_memory(&mut self, memory: MemoryUsage) {
        self.memory_total = memory.total_bytes;
        self.memory_used = memory.used_bytes;
        self.memory_percent = memory.percent.min(100);
        self.memory_info = memory.summary();
    }
}
