#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sysdash::system::SourceError;
use sysdash::system::cpu::{CounterSource, CpuTimes, MemoryStatus};
use sysdash::system::identity::{DisplayMode, IdentitySource};
use sysdash::system::network::{AdapterEntry, AdapterKind, AdapterTable};
use sysdash::system::storage::{DiskRecord, ManagementService};
use sysdash::system::volumes::{VolumeCapacity, VolumeSource};

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Shared record of which extractor touched the host, in call order.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn record(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Scripted host. CPU samples are consumed one per read; the last one
/// repeats once the queue runs dry.
pub struct FakeHost {
    pub log: CallLog,
    pub cpu_samples: VecDeque<CpuTimes>,
    pub memory: MemoryStatus,
    pub volumes: Vec<(String, VolumeCapacity)>,
    pub adapters: Vec<AdapterEntry>,
    pub disks: Vec<DiskRecord>,
    pub service_fails: bool,
    pub adapters_panic: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        FakeHost {
            log: CallLog::default(),
            cpu_samples: VecDeque::from([CpuTimes::default()]),
            memory: MemoryStatus {
                total_bytes: 16 * GIB,
                available_bytes: 4 * GIB,
            },
            volumes: vec![
                (
                    "C:".to_string(),
                    VolumeCapacity {
                        total_bytes: 100 * GIB,
                        free_bytes: 25 * GIB,
                        fstype: Some("NTFS".to_string()),
                    },
                ),
                (
                    "D:".to_string(),
                    VolumeCapacity {
                        total_bytes: 200 * GIB,
                        free_bytes: 200 * GIB,
                        fstype: None,
                    },
                ),
            ],
            adapters: vec![
                AdapterEntry {
                    description: "Intel(R) Ethernet".to_string(),
                    kind: AdapterKind::Ethernet,
                },
                AdapterEntry {
                    description: "Software Loopback".to_string(),
                    kind: AdapterKind::Loopback,
                },
                AdapterEntry {
                    description: "Wi-Fi 6 AX201".to_string(),
                    kind: AdapterKind::Wireless,
                },
            ],
            disks: vec![DiskRecord {
                model: Some("Samsung SSD 980".to_string()),
                size: Some("1000204886016".to_string()),
                interface: Some("SCSI".to_string()),
                serial: None,
            }],
            service_fails: false,
            adapters_panic: false,
        }
    }

    pub fn with_cpu_samples(mut self, samples: impl IntoIterator<Item = CpuTimes>) -> Self {
        self.cpu_samples = samples.into_iter().collect();
        self
    }
}

impl IdentitySource for FakeHost {
    fn os_name(&self) -> Result<String, SourceError> {
        self.log.record("identity");
        Ok("Windows 11 Pro".to_string())
    }

    fn kernel_version(&self) -> Result<String, SourceError> {
        Ok("NT 10.0.22631".to_string())
    }

    fn shell_name(&self) -> Result<String, SourceError> {
        Ok("PowerShell".to_string())
    }

    fn cpu_model(&self) -> Result<String, SourceError> {
        Ok("AMD Ryzen 7 5800X 8-Core Processor".to_string())
    }

    fn gpu_label(&self) -> Result<String, SourceError> {
        Err(SourceError::Unavailable("display adapter"))
    }

    fn display_mode(&self) -> Result<DisplayMode, SourceError> {
        Ok(DisplayMode {
            width: 2560,
            height: 1440,
            refresh_hz: 144,
        })
    }

    fn username(&self) -> Result<String, SourceError> {
        Ok("ada".to_string())
    }

    fn home_dir(&self) -> Result<String, SourceError> {
        Ok("C:\\Users\\ada".to_string())
    }

    fn uptime_seconds(&self) -> Result<u64, SourceError> {
        Ok(2 * 86_400 + 75 * 60)
    }
}

impl CounterSource for FakeHost {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError> {
        self.log.record("cpu");
        let sample = if self.cpu_samples.len() > 1 {
            self.cpu_samples.pop_front()
        } else {
            self.cpu_samples.front().copied()
        };
        sample.ok_or(SourceError::Unavailable("cpu times"))
    }

    fn memory_status(&mut self) -> Result<MemoryStatus, SourceError> {
        self.log.record("memory");
        Ok(self.memory)
    }
}

impl VolumeSource for FakeHost {
    fn present_volumes(&mut self) -> Result<Vec<String>, SourceError> {
        self.log.record("volumes");
        Ok(self.volumes.iter().map(|(name, _)| name.clone()).collect())
    }

    fn capacity(&mut self, volume: &str) -> Result<VolumeCapacity, SourceError> {
        self.volumes
            .iter()
            .find(|(name, _)| name == volume)
            .map(|(_, capacity)| capacity.clone())
            .ok_or(SourceError::Unavailable("volume"))
    }
}

impl AdapterTable for FakeHost {
    fn required_len(&mut self) -> Result<usize, SourceError> {
        self.log.record("network");
        if self.adapters_panic {
            panic!("adapter table corrupted");
        }
        Ok(self.adapters.len() * 640)
    }

    fn fill(&mut self, _len: usize) -> Result<Vec<AdapterEntry>, SourceError> {
        Ok(self.adapters.clone())
    }
}

impl ManagementService for FakeHost {
    type Session = ();
    type Locator = ();
    type Connection = ();
    type Records = std::vec::IntoIter<DiskRecord>;

    fn initialize(&self) -> Result<(), SourceError> {
        self.log.record("storage");
        if self.service_fails {
            return Err(SourceError::Os {
                call: "CoInitializeEx",
                code: 0x8001_0106,
            });
        }
        Ok(())
    }

    fn initialize_security(&self, _session: &()) -> Result<(), SourceError> {
        Ok(())
    }

    fn create_locator(&self, _session: &()) -> Result<(), SourceError> {
        Ok(())
    }

    fn connect(&self, _locator: &(), _namespace: &str) -> Result<(), SourceError> {
        Ok(())
    }

    fn set_call_authorization(&self, _connection: &()) -> Result<(), SourceError> {
        Ok(())
    }

    fn exec_query(&self, _connection: &(), _query: &str) -> Result<Self::Records, SourceError> {
        Ok(self.disks.clone().into_iter())
    }

    fn next_record(&self, records: &mut Self::Records) -> Result<Option<DiskRecord>, SourceError> {
        Ok(records.next())
    }
}
