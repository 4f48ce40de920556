use std::fmt;

use tracing::debug;

use super::error::SourceError;
use crate::format::format_uptime;

pub const UNKNOWN_CPU: &str = "Unknown CPU";
pub const GENERIC_GPU: &str = "Generic GPU";
pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_hz: u32,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ {} Hz", self.width, self.height, self.refresh_hz)
    }
}

/// Static host facts, read once at startup.
pub trait IdentitySource {
    /// Substituted when the OS product name cannot be read.
    const OS_FALLBACK: &'static str = "Windows";

    fn os_name(&self) -> Result<String, SourceError>;
    fn kernel_version(&self) -> Result<String, SourceError>;
    fn shell_name(&self) -> Result<String, SourceError>;
    fn cpu_model(&self) -> Result<String, SourceError>;
    fn gpu_label(&self) -> Result<String, SourceError>;
    fn display_mode(&self) -> Result<DisplayMode, SourceError>;
    fn username(&self) -> Result<String, SourceError>;

    fn home_dir(&self) -> Result<String, SourceError> {
        dirs::home_dir()
            .map(|path| path.display().to_string())
            .ok_or(SourceError::Unavailable("home directory"))
    }

    fn uptime_seconds(&self) -> Result<u64, SourceError> {
        Ok(sysinfo::System::uptime())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub os_name: String,
    pub kernel: String,
    pub shell: String,
    pub cpu_model: String,
    pub gpu: String,
    pub display: String,
    pub username: String,
    pub home_dir: String,
    pub uptime: String,
}

/// Reads every identity field. Each one falls back on its own, so one
/// failing read never hides the others.
pub fn read_identity<S: IdentitySource + ?Sized>(
    source: &S,
    shell_override: Option<&str>,
) -> Identity {
    let shell = match shell_override {
        Some(shell) => shell.to_string(),
        None => or_fallback("shell", source.shell_name(), UNKNOWN),
    };

    Identity {
        os_name: or_fallback("os_name", source.os_name(), S::OS_FALLBACK),
        kernel: or_fallback("kernel", source.kernel_version(), UNKNOWN),
        shell,
        cpu_model: or_fallback("cpu_model", source.cpu_model(), UNKNOWN_CPU),
        gpu: or_fallback("gpu", source.gpu_label(), GENERIC_GPU),
        display: or_fallback(
            "display",
            source.display_mode().map(|mode| mode.to_string()),
            UNKNOWN,
        ),
        username: or_fallback("username", source.username(), DEFAULT_USER),
        home_dir: or_fallback("home_dir", source.home_dir(), ""),
        uptime: or_fallback(
            "uptime",
            source.uptime_seconds().map(format_uptime),
            UNKNOWN,
        ),
    }
}

fn or_fallback(field: &'static str, value: Result<String, SourceError>, fallback: &str) -> String {
    match value {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        Ok(_) => {
            debug!(field, "empty value, using fallback");
            fallback.to_string()
        }
        Err(err) => {
            debug!(field, error = %err, "read failed, using fallback");
            fallback.to_string()
        }
    }
}
