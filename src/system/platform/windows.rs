use std::ffi::c_void;
use std::ptr;

use ::windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx,
    CoInitializeSecurity, CoSetProxyBlanket, CoUninitialize, EOAC_NONE, RPC_C_AUTHN_LEVEL_CALL,
    RPC_C_AUTHN_LEVEL_DEFAULT, RPC_C_IMP_LEVEL_IMPERSONATE,
};
use ::windows::Win32::System::Rpc::{RPC_C_AUTHN_WINNT, RPC_C_AUTHZ_NONE};
use ::windows::Win32::System::Variant::{VARIANT, VT_BSTR, VariantClear};
use ::windows::Win32::System::Wmi::{
    IEnumWbemClassObject, IWbemClassObject, IWbemLocator, IWbemServices, WBEM_FLAG_FORWARD_ONLY,
    WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_INFINITE, WbemLocator,
};
use ::windows::core::{BSTR, HSTRING, PCWSTR};
use windows_sys::Win32::Foundation::{
    ERROR_BUFFER_OVERFLOW, ERROR_NO_DATA, ERROR_SUCCESS, FILETIME,
};
use windows_sys::Win32::Graphics::Gdi::{
    DEVMODEW, DISPLAY_DEVICE_PRIMARY_DEVICE, DISPLAY_DEVICEW, ENUM_CURRENT_SETTINGS,
    EnumDisplayDevicesW, EnumDisplaySettingsW,
};
use windows_sys::Win32::NetworkManagement::IpHelper::{GetAdaptersInfo, IP_ADAPTER_INFO};
use windows_sys::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetLogicalDrives, GetVolumeInformationW,
};
use windows_sys::Win32::System::Registry::{
    HKEY_LOCAL_MACHINE, RRF_RT_REG_DWORD, RRF_RT_REG_SZ, RegGetValueW,
};
use windows_sys::Win32::System::SystemInformation::{
    GetTickCount64, GlobalMemoryStatusEx, MEMORYSTATUSEX,
};
use windows_sys::Win32::System::Threading::GetSystemTimes;
use windows_sys::Win32::System::WindowsProgramming::GetUserNameW;

use crate::system::SourceError;
use crate::system::cpu::{CounterSource, CpuTimes, MemoryStatus};
use crate::system::identity::{DisplayMode, IdentitySource};
use crate::system::network::{AdapterEntry, AdapterKind, AdapterTable};
use crate::system::storage::{DiskRecord, ManagementService};
use crate::system::volumes::{VolumeCapacity, VolumeSource, drive_letters};

const CURRENT_VERSION_KEY: &str = "SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion";
const PROCESSOR_KEY: &str = "HARDWARE\\DESCRIPTION\\System\\CentralProcessor\\0";

const MIB_IF_TYPE_ETHERNET: u32 = 6;
const MIB_IF_TYPE_LOOPBACK: u32 = 24;
const IF_TYPE_IEEE80211: u32 = 71;

#[derive(Debug, Default)]
pub struct Host;

impl Host {
    pub fn new() -> Self {
        Host
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn from_wide(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

fn filetime_ticks(ft: &FILETIME) -> u64 {
    (u64::from(ft.dwHighDateTime) << 32) | u64::from(ft.dwLowDateTime)
}

fn registry_string(subkey: &str, value: &str) -> Result<String, SourceError> {
    let subkey = wide(subkey);
    let value = wide(value);
    let mut buf = [0u16; 512];
    let mut size = std::mem::size_of_val(&buf) as u32;
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey.as_ptr(),
            value.as_ptr(),
            RRF_RT_REG_SZ,
            ptr::null_mut(),
            buf.as_mut_ptr().cast::<c_void>(),
            &mut size,
        )
    };
    if status != ERROR_SUCCESS {
        return Err(SourceError::Os {
            call: "RegGetValueW",
            code: status,
        });
    }
    Ok(from_wide(&buf))
}

fn registry_dword(subkey: &str, value: &str) -> Result<u32, SourceError> {
    let subkey = wide(subkey);
    let value = wide(value);
    let mut data = 0u32;
    let mut size = std::mem::size_of::<u32>() as u32;
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey.as_ptr(),
            value.as_ptr(),
            RRF_RT_REG_DWORD,
            ptr::null_mut(),
            (&mut data as *mut u32).cast::<c_void>(),
            &mut size,
        )
    };
    if status != ERROR_SUCCESS {
        return Err(SourceError::Os {
            call: "RegGetValueW",
            code: status,
        });
    }
    Ok(data)
}

impl IdentitySource for Host {
    fn os_name(&self) -> Result<String, SourceError> {
        registry_string(CURRENT_VERSION_KEY, "ProductName")
    }

    fn kernel_version(&self) -> Result<String, SourceError> {
        let major = registry_dword(CURRENT_VERSION_KEY, "CurrentMajorVersionNumber")?;
        let minor = registry_dword(CURRENT_VERSION_KEY, "CurrentMinorVersionNumber")?;
        match registry_string(CURRENT_VERSION_KEY, "CurrentBuildNumber") {
            Ok(build) => Ok(format!("NT {major}.{minor}.{build}")),
            Err(_) => Ok(format!("NT {major}.{minor}")),
        }
    }

    fn shell_name(&self) -> Result<String, SourceError> {
        Ok("PowerShell".to_string())
    }

    fn cpu_model(&self) -> Result<String, SourceError> {
        registry_string(PROCESSOR_KEY, "ProcessorNameString")
    }

    fn gpu_label(&self) -> Result<String, SourceError> {
        let mut index = 0u32;
        loop {
            let mut device: DISPLAY_DEVICEW = unsafe { std::mem::zeroed() };
            device.cb = std::mem::size_of::<DISPLAY_DEVICEW>() as u32;
            let ok = unsafe { EnumDisplayDevicesW(ptr::null(), index, &mut device, 0) };
            if ok == 0 {
                return Err(SourceError::Unavailable("primary display device"));
            }
            if device.StateFlags & DISPLAY_DEVICE_PRIMARY_DEVICE != 0 {
                return Ok(from_wide(&device.DeviceString));
            }
            index += 1;
        }
    }

    fn display_mode(&self) -> Result<DisplayMode, SourceError> {
        let mut mode: DEVMODEW = unsafe { std::mem::zeroed() };
        mode.dmSize = std::mem::size_of::<DEVMODEW>() as u16;
        let ok = unsafe { EnumDisplaySettingsW(ptr::null(), ENUM_CURRENT_SETTINGS, &mut mode) };
        if ok == 0 {
            return Err(SourceError::Os {
                call: "EnumDisplaySettingsW",
                code: 0,
            });
        }
        Ok(DisplayMode {
            width: mode.dmPelsWidth,
            height: mode.dmPelsHeight,
            refresh_hz: mode.dmDisplayFrequency,
        })
    }

    fn username(&self) -> Result<String, SourceError> {
        let mut buf = [0u16; 257];
        let mut len = buf.len() as u32;
        let ok = unsafe { GetUserNameW(buf.as_mut_ptr(), &mut len) };
        if ok == 0 {
            return Err(SourceError::Os {
                call: "GetUserNameW",
                code: 0,
            });
        }
        Ok(from_wide(&buf))
    }

    fn uptime_seconds(&self) -> Result<u64, SourceError> {
        Ok(unsafe { GetTickCount64() } / 1000)
    }
}

impl CounterSource for Host {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError> {
        let mut idle: FILETIME = unsafe { std::mem::zeroed() };
        let mut kernel: FILETIME = unsafe { std::mem::zeroed() };
        let mut user: FILETIME = unsafe { std::mem::zeroed() };
        let ok = unsafe { GetSystemTimes(&mut idle, &mut kernel, &mut user) };
        if ok == 0 {
            return Err(SourceError::Os {
                call: "GetSystemTimes",
                code: 0,
            });
        }
        Ok(CpuTimes {
            idle: filetime_ticks(&idle),
            kernel: filetime_ticks(&kernel),
            user: filetime_ticks(&user),
        })
    }

    fn memory_status(&mut self) -> Result<MemoryStatus, SourceError> {
        let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
        status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;
        let ok = unsafe { GlobalMemoryStatusEx(&mut status) };
        if ok == 0 {
            return Err(SourceError::Os {
                call: "GlobalMemoryStatusEx",
                code: 0,
            });
        }
        Ok(MemoryStatus {
            total_bytes: status.ullTotalPhys,
            available_bytes: status.ullAvailPhys,
        })
    }
}

impl VolumeSource for Host {
    fn present_volumes(&mut self) -> Result<Vec<String>, SourceError> {
        let mask = unsafe { GetLogicalDrives() };
        if mask == 0 {
            return Err(SourceError::Os {
                call: "GetLogicalDrives",
                code: 0,
            });
        }
        Ok(drive_letters(mask))
    }

    fn capacity(&mut self, volume: &str) -> Result<VolumeCapacity, SourceError> {
        let root = wide(&format!("{volume}\\"));
        let mut free = 0u64;
        let mut total = 0u64;
        let ok = unsafe { GetDiskFreeSpaceExW(root.as_ptr(), &mut free, &mut total, ptr::null_mut()) };
        if ok == 0 {
            return Err(SourceError::Os {
                call: "GetDiskFreeSpaceExW",
                code: 0,
            });
        }

        let mut fs_name = [0u16; 64];
        let fs_ok = unsafe {
            GetVolumeInformationW(
                root.as_ptr(),
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                fs_name.as_mut_ptr(),
                fs_name.len() as u32,
            )
        };

        Ok(VolumeCapacity {
            total_bytes: total,
            free_bytes: free,
            fstype: (fs_ok != 0).then(|| from_wide(&fs_name)),
        })
    }
}

impl AdapterTable for Host {
    fn required_len(&mut self) -> Result<usize, SourceError> {
        let mut size = 0u32;
        let status = unsafe { GetAdaptersInfo(ptr::null_mut(), &mut size) };
        match status {
            ERROR_BUFFER_OVERFLOW => Ok(size as usize),
            ERROR_NO_DATA => Ok(0),
            code => Err(SourceError::Os {
                call: "GetAdaptersInfo",
                code,
            }),
        }
    }

    fn fill(&mut self, len: usize) -> Result<Vec<AdapterEntry>, SourceError> {
        // u64 storage keeps the adapter records aligned.
        let mut buf = vec![0u64; len.div_ceil(8).max(1)];
        let mut size = (buf.len() * 8) as u32;
        let head = buf.as_mut_ptr().cast::<IP_ADAPTER_INFO>();
        let status = unsafe { GetAdaptersInfo(head, &mut size) };
        if status != ERROR_SUCCESS {
            return Err(SourceError::Os {
                call: "GetAdaptersInfo",
                code: status,
            });
        }

        let mut entries = Vec::new();
        let mut cursor: *const IP_ADAPTER_INFO = head;
        while !cursor.is_null() {
            let info = unsafe { &*cursor };
            let description: Vec<u8> = info
                .Description
                .iter()
                .take_while(|&&c| c != 0)
                .map(|&c| c as u8)
                .collect();
            entries.push(AdapterEntry {
                description: String::from_utf8_lossy(&description).into_owned(),
                kind: match info.Type {
                    MIB_IF_TYPE_ETHERNET => AdapterKind::Ethernet,
                    IF_TYPE_IEEE80211 => AdapterKind::Wireless,
                    MIB_IF_TYPE_LOOPBACK => AdapterKind::Loopback,
                    _ => AdapterKind::Other,
                },
            });
            cursor = info.Next;
        }
        Ok(entries)
    }
}

/// COM apartment for one query; uninitialized on drop, after every
/// interface acquired under it has been released.
pub struct ComSession(());

impl Drop for ComSession {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

fn hresult_error(call: &'static str, err: ::windows::core::Error) -> SourceError {
    SourceError::Os {
        call,
        code: err.code().0 as u32,
    }
}

fn string_property(object: &IWbemClassObject, name: &str) -> Option<String> {
    let name = HSTRING::from(name);
    let mut value = VARIANT::default();
    unsafe {
        object
            .Get(PCWSTR(name.as_ptr()), 0, &mut value, None, None)
            .ok()?;
        let inner = &value.Anonymous.Anonymous;
        let text = (inner.vt == VT_BSTR).then(|| inner.Anonymous.bstrVal.to_string());
        let _ = VariantClear(&mut value);
        text
    }
}

impl ManagementService for Host {
    type Session = ComSession;
    type Locator = IWbemLocator;
    type Connection = IWbemServices;
    type Records = IEnumWbemClassObject;

    fn initialize(&self) -> Result<ComSession, SourceError> {
        // RPC_E_CHANGED_MODE (apartment already set to a different model)
        // is an error HRESULT and fails here.
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr.is_err() {
            return Err(SourceError::Os {
                call: "CoInitializeEx",
                code: hr.0 as u32,
            });
        }
        // S_OK or S_FALSE: both must be balanced by CoUninitialize.
        Ok(ComSession(()))
    }

    fn initialize_security(&self, _session: &ComSession) -> Result<(), SourceError> {
        unsafe {
            CoInitializeSecurity(
                None,
                -1,
                None,
                None,
                RPC_C_AUTHN_LEVEL_DEFAULT,
                RPC_C_IMP_LEVEL_IMPERSONATE,
                None,
                EOAC_NONE,
                None,
            )
        }
        .map_err(|e| hresult_error("CoInitializeSecurity", e))
    }

    fn create_locator(&self, _session: &ComSession) -> Result<IWbemLocator, SourceError> {
        unsafe { CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER) }
            .map_err(|e| hresult_error("CoCreateInstance", e))
    }

    fn connect(
        &self,
        locator: &IWbemLocator,
        namespace: &str,
    ) -> Result<IWbemServices, SourceError> {
        unsafe {
            locator.ConnectServer(
                &BSTR::from(namespace),
                &BSTR::new(),
                &BSTR::new(),
                &BSTR::new(),
                0,
                &BSTR::new(),
                None,
            )
        }
        .map_err(|e| hresult_error("IWbemLocator::ConnectServer", e))
    }

    fn set_call_authorization(&self, connection: &IWbemServices) -> Result<(), SourceError> {
        unsafe {
            CoSetProxyBlanket(
                connection,
                RPC_C_AUTHN_WINNT,
                RPC_C_AUTHZ_NONE,
                None,
                RPC_C_AUTHN_LEVEL_CALL,
                RPC_C_IMP_LEVEL_IMPERSONATE,
                None,
                EOAC_NONE,
            )
        }
        .map_err(|e| hresult_error("CoSetProxyBlanket", e))
    }

    fn exec_query(
        &self,
        connection: &IWbemServices,
        query: &str,
    ) -> Result<IEnumWbemClassObject, SourceError> {
        unsafe {
            connection.ExecQuery(
                &BSTR::from("WQL"),
                &BSTR::from(query),
                WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
                None,
            )
        }
        .map_err(|e| hresult_error("IWbemServices::ExecQuery", e))
    }

    fn next_record(
        &self,
        records: &mut IEnumWbemClassObject,
    ) -> Result<Option<DiskRecord>, SourceError> {
        let mut objects: [Option<IWbemClassObject>; 1] = [None];
        let mut returned = 0u32;
        let hr = unsafe { records.Next(WBEM_INFINITE.0, &mut objects, &mut returned) };
        if hr.is_err() {
            return Err(SourceError::Os {
                call: "IEnumWbemClassObject::Next",
                code: hr.0 as u32,
            });
        }
        if returned == 0 {
            return Ok(None);
        }
        let Some(object) = objects[0].take() else {
            return Ok(None);
        };

        Ok(Some(DiskRecord {
            model: string_property(&object, "Model"),
            size: string_property(&object, "Size"),
            interface: string_property(&object, "InterfaceType"),
            serial: string_property(&object, "SerialNumber"),
        }))
    }
}
