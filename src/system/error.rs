use thiserror::Error;

/// Failure reading one OS source. Extractors log these and substitute a
/// fallback value; they never reach the snapshot consumer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    #[error("{call} failed with code {code:#x}")]
    Os { call: &'static str, code: u32 },

    #[error("could not parse {0}")]
    Parse(String),

    #[error("not supported on this platform")]
    Unsupported,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
