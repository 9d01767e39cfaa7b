//! Driver selection: maps a requested backend (or platform
//! auto-detection) to a constructible driver handle.
//!
//! The selector returns a [`SelectedDriver`] handle, not an instance;
//! the caller instantiates it and owns the driver's lifetime.

use crate::driver::{HostDriver, ProcfsDriver};

/// Which backend the caller wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DriverKind {
    /// Pick from the host platform: the library-backed driver on
    /// Windows, the direct kernel-interface driver elsewhere.
    #[default]
    Auto,
    /// Direct `/proc` + `/sys` parsing.
    Procfs,
    /// The `sysinfo`-backed driver.
    Sysinfo,
}

/// Configuration error raised at selection time.
///
/// Never a silent fallback: if the platform-appropriate backend is not
/// compiled in, the caller hears about it immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The requested backend is not available in this build.
    Unavailable(String),
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::Unavailable(msg) => {
                write!(f, "host monitor driver unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for SelectError {}

/// A driver type handle: knows how to construct its backend but is not
/// an instance itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectedDriver {
    Procfs,
    #[cfg(feature = "sysinfo-driver")]
    Sysinfo,
}

impl SelectedDriver {
    /// Instantiates the selected backend with zero-initialized
    /// sampling state.
    pub fn build(self) -> Box<dyn HostDriver> {
        match self {
            SelectedDriver::Procfs => Box::new(ProcfsDriver::new()),
            #[cfg(feature = "sysinfo-driver")]
            SelectedDriver::Sysinfo => Box::new(crate::driver::SysinfoDriver::new()),
        }
    }
}

/// Chooses a driver backend.
///
/// `Auto` inspects the host platform identifier and picks the
/// library-backed driver only where the kernel interfaces are absent.
pub fn select_driver(kind: DriverKind) -> Result<SelectedDriver, SelectError> {
    match kind {
        DriverKind::Procfs => Ok(SelectedDriver::Procfs),
        DriverKind::Sysinfo => sysinfo_handle(),
        DriverKind::Auto => {
            let os = std::env::consts::OS;
            tracing::debug!(os, "auto-selecting host monitor driver");
            if os == "windows" {
                sysinfo_handle()
            } else {
                Ok(SelectedDriver::Procfs)
            }
        }
    }
}

#[cfg(feature = "sysinfo-driver")]
fn sysinfo_handle() -> Result<SelectedDriver, SelectError> {
    Ok(SelectedDriver::Sysinfo)
}

#[cfg(not(feature = "sysinfo-driver"))]
fn sysinfo_handle() -> Result<SelectedDriver, SelectError> {
    Err(SelectError::Unavailable(
        "the sysinfo backend requires building with the `sysinfo-driver` feature".to_string(),
    ))
}
