use std::path::Path;

use sysinfo::{CpuRefreshKind, Disks, Networks, System};

use crate::system::SourceError;
use crate::system::cpu::{CounterSource, CpuTimes, MemoryStatus};
use crate::system::identity::{DisplayMode, IdentitySource};
use crate::system::network::{AdapterEntry, AdapterKind, AdapterTable};
use crate::system::storage::{DiskRecord, ManagementService};
use crate::system::volumes::{VolumeCapacity, VolumeSource};

pub struct Host {
    sys: System,
    volumes: Vec<(String, VolumeCapacity)>,
    interfaces: Vec<String>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_list(CpuRefreshKind::nothing());
        Host {
            sys,
            volumes: Vec::new(),
            interfaces: Vec::new(),
        }
    }
}

impl IdentitySource for Host {
    const OS_FALLBACK: &'static str = std::env::consts::OS;

    fn os_name(&self) -> Result<String, SourceError> {
        System::long_os_version().ok_or(SourceError::Unavailable("os version"))
    }

    fn kernel_version(&self) -> Result<String, SourceError> {
        System::kernel_version().ok_or(SourceError::Unavailable("kernel version"))
    }

    fn shell_name(&self) -> Result<String, SourceError> {
        let shell = std::env::var("SHELL").map_err(|_| SourceError::Unavailable("SHELL"))?;
        Path::new(&shell)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(SourceError::Parse(shell))
    }

    fn cpu_model(&self) -> Result<String, SourceError> {
        self.sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .filter(|brand| !brand.is_empty())
            .ok_or(SourceError::Unavailable("cpu brand"))
    }

    fn gpu_label(&self) -> Result<String, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn display_mode(&self) -> Result<DisplayMode, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn username(&self) -> Result<String, SourceError> {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .map_err(|_| SourceError::Unavailable("USER"))
    }
}

impl CounterSource for Host {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError> {
        read_proc_stat()
    }

    fn memory_status(&mut self) -> Result<MemoryStatus, SourceError> {
        self.sys.refresh_memory();
        Ok(MemoryStatus {
            total_bytes: self.sys.total_memory(),
            available_bytes: self.sys.available_memory(),
        })
    }
}

#[cfg(target_os = "linux")]
fn read_proc_stat() -> Result<CpuTimes, SourceError> {
    let contents = std::fs::read_to_string("/proc/stat")?;
    parse_proc_stat(&contents)
}

#[cfg(not(target_os = "linux"))]
fn read_proc_stat() -> Result<CpuTimes, SourceError> {
    Err(SourceError::Unsupported)
}

/// Maps the aggregate `cpu` line of `/proc/stat` onto idle/kernel/user
/// accumulators, folding idle time into kernel time so that
/// `kernel + user` covers all elapsed ticks.
fn parse_proc_stat(contents: &str) -> Result<CpuTimes, SourceError> {
    let line = contents
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| SourceError::Parse("/proc/stat cpu line".into()))?;

    // user nice system idle iowait irq softirq steal
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| SourceError::Parse(format!("/proc/stat: {e}")))?;
    if fields.len() < 4 {
        return Err(SourceError::Parse("/proc/stat: too few fields".into()));
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or(0);

    let idle = field(3) + field(4);
    let system = field(2) + field(5) + field(6) + field(7);
    Ok(CpuTimes {
        idle,
        kernel: system + idle,
        user: field(0) + field(1),
    })
}

impl VolumeSource for Host {
    fn present_volumes(&mut self) -> Result<Vec<String>, SourceError> {
        let disks = Disks::new_with_refreshed_list();
        self.volumes = disks
            .list()
            .iter()
            .map(|disk| {
                (
                    disk.mount_point().display().to_string(),
                    VolumeCapacity {
                        total_bytes: disk.total_space(),
                        free_bytes: disk.available_space(),
                        fstype: Some(disk.file_system().to_string_lossy().into_owned()),
                    },
                )
            })
            .collect();
        Ok(self.volumes.iter().map(|(mount, _)| mount.clone()).collect())
    }

    fn capacity(&mut self, volume: &str) -> Result<VolumeCapacity, SourceError> {
        self.volumes
            .iter()
            .find(|(mount, _)| mount == volume)
            .map(|(_, capacity)| capacity.clone())
            .ok_or(SourceError::Unavailable("volume capacity"))
    }
}

impl AdapterTable for Host {
    fn required_len(&mut self) -> Result<usize, SourceError> {
        let networks = Networks::new_with_refreshed_list();
        let mut names: Vec<String> = networks.list().keys().cloned().collect();
        names.sort();
        self.interfaces = names;
        Ok(self.interfaces.len())
    }

    fn fill(&mut self, len: usize) -> Result<Vec<AdapterEntry>, SourceError> {
        if len != self.interfaces.len() {
            return Err(SourceError::Unavailable("interface list changed"));
        }
        Ok(self
            .interfaces
            .iter()
            .map(|name| AdapterEntry {
                description: name.clone(),
                kind: interface_kind(name),
            })
            .collect())
    }
}

#[cfg(target_os = "linux")]
fn interface_kind(name: &str) -> AdapterKind {
    let base = Path::new("/sys/class/net").join(name);
    if base.join("wireless").exists() || base.join("phy80211").exists() {
        return AdapterKind::Wireless;
    }
    let link_type = std::fs::read_to_string(base.join("type")).unwrap_or_default();
    match link_type.trim() {
        "772" => AdapterKind::Loopback,
        "1" if base.join("device").exists() => AdapterKind::Ethernet,
        _ => AdapterKind::Other,
    }
}

#[cfg(not(target_os = "linux"))]
fn interface_kind(name: &str) -> AdapterKind {
    kind_from_name(name)
}

#[cfg_attr(target_os = "linux", allow(dead_code))]
fn kind_from_name(name: &str) -> AdapterKind {
    if name.starts_with("lo") {
        AdapterKind::Loopback
    } else if name.starts_with("wl") {
        AdapterKind::Wireless
    } else if name.starts_with("en") || name.starts_with("eth") {
        AdapterKind::Ethernet
    } else {
        AdapterKind::Other
    }
}

/// There is no instrumentation service here; the session never starts.
impl ManagementService for Host {
    type Session = ();
    type Locator = ();
    type Connection = ();
    type Records = ();

    fn initialize(&self) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn initialize_security(&self, _session: &()) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn create_locator(&self, _session: &()) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn connect(&self, _locator: &(), _namespace: &str) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn set_call_authorization(&self, _connection: &()) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn exec_query(&self, _connection: &(), _query: &str) -> Result<(), SourceError> {
        Err(SourceError::Unsupported)
    }

    fn next_record(&self, _records: &mut ()) -> Result<Option<DiskRecord>, SourceError> {
        Ok(None)
    }
}
