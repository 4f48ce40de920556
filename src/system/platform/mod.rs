//! Host backends. The native backend talks to the Windows registry, Win32
//! and WMI; the portable one (sysinfo + procfs) keeps the crate usable
//! elsewhere but has no instrumentation service.

#[cfg(not(target_os = "windows"))]
mod portable;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(target_os = "windows"))]
pub use portable::Host;
#[cfg(target_os = "windows")]
pub use windows::Host;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::cpu::CounterSource;
    use crate::system::identity::read_identity;
    use crate::system::network::active_adapters;
    use crate::system::storage::query_disk_inventory;
    use crate::system::volumes::enumerate_volumes;

    #[test]
    fn host_reads_do_not_panic() {
        let mut host = Host::new();
        let _ = read_identity(&host, None);
        let _ = host.cpu_times();
        let _ = host.memory_status();
        let _ = enumerate_volumes(&mut host);
        let _ = query_disk_inventory(&host);
        let _ = active_adapters(&mut host);
    }

    #[test]
    fn volume_listing_is_stable_between_reads() {
        let mut host = Host::new();
        let first: Vec<String> = enumerate_volumes(&mut host)
            .into_iter()
            .map(|r| r.drive)
            .collect();
        let second: Vec<String> = enumerate_volumes(&mut host)
            .into_iter()
            .map(|r| r.drive)
            .collect();
        assert_eq!(first, second);
    }
}
