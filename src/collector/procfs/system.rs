//! Reader for the kernel counter interfaces under `/proc`, `/sys`, and `/etc`.

use crate::collector::procfs::parser::{
    ParseError, parse_diskstats, parse_fstab, parse_meminfo, parse_net_dev, parse_stat,
};
use crate::collector::traits::FileSystem;
use crate::model::{
    CpuSnapshot, DEFAULT_SECTOR_SIZE, DiskSnapshot, MemorySnapshot, MountEntry, NetSnapshot,
};
use std::collections::HashSet;
use std::path::Path;

/// Error type for a failed read of a kernel interface.
///
/// Either kind is fatal to the current sampling cycle and is never
/// retried here; the caller's stored snapshots stay untouched so the
/// next cycle can diff against the last good reading.
#[derive(Debug)]
pub enum CollectError {
    /// Interface file missing, unreadable, or permission-denied.
    Io(std::io::Error),
    /// A line did not match the expected fixed-column shape.
    Parse(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e.message)
    }
}

/// Reads kernel counter interfaces into typed snapshots.
///
/// The reader is stateless between calls: every `read_*` performs one
/// synchronous read of its interface file and returns a fresh snapshot.
/// All counter history lives in the driver that owns the reader.
pub struct SystemReader<F: FileSystem> {
    fs: F,
    proc_path: String,
    sys_path: String,
    etc_path: String,
    sector_size: u64,
}

impl<F: FileSystem> SystemReader<F> {
    /// Creates a reader over the standard roots (`/proc`, `/sys`, `/etc`).
    pub fn new(fs: F) -> Self {
        Self::with_roots(fs, "/proc", "/sys", "/etc")
    }

    /// Creates a reader with custom filesystem roots.
    pub fn with_roots(
        fs: F,
        proc_path: impl Into<String>,
        sys_path: impl Into<String>,
        etc_path: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            sys_path: sys_path.into(),
            etc_path: etc_path.into(),
            sector_size: DEFAULT_SECTOR_SIZE,
        }
    }

    /// Overrides the bytes-per-sector used for disk byte conversion.
    pub fn with_sector_size(mut self, sector_size: u64) -> Self {
        self.sector_size = sector_size;
        self
    }

    fn read_file(&self, path: &str) -> Result<String, CollectError> {
        Ok(self.fs.read_to_string(Path::new(path))?)
    }

    /// Reads `/proc/stat` into a CPU snapshot.
    pub fn read_cpu(&self) -> Result<CpuSnapshot, CollectError> {
        let content = self.read_file(&format!("{}/stat", self.proc_path))?;
        Ok(parse_stat(&content)?)
    }

    /// Reads `/proc/meminfo` into a memory snapshot.
    pub fn read_meminfo(&self) -> Result<MemorySnapshot, CollectError> {
        let content = self.read_file(&format!("{}/meminfo", self.proc_path))?;
        Ok(parse_meminfo(&content)?)
    }

    /// Reads `/proc/net/dev` into a network snapshot.
    pub fn read_net_dev(&self) -> Result<NetSnapshot, CollectError> {
        let content = self.read_file(&format!("{}/net/dev", self.proc_path))?;
        Ok(parse_net_dev(&content)?)
    }

    /// Reads `/proc/diskstats` into a disk snapshot, restricting the
    /// aggregate view to physical devices.
    pub fn read_diskstats(&self) -> Result<DiskSnapshot, CollectError> {
        let content = self.read_file(&format!("{}/diskstats", self.proc_path))?;
        let devices = parse_diskstats(&content)?;
        let physical = self.physical_devices()?;

        tracing::debug!(
            devices = devices.len(),
            physical = physical.len(),
            "read diskstats"
        );

        Ok(DiskSnapshot {
            devices,
            physical,
            sector_size: self.sector_size,
        })
    }

    /// Reads `/etc/fstab` into mount-table records.
    pub fn read_fstab(&self) -> Result<Vec<MountEntry>, CollectError> {
        let content = self.read_file(&format!("{}/fstab", self.etc_path))?;
        Ok(parse_fstab(&content)?)
    }

    /// Discovers physical block devices: everything listed under
    /// `/sys/block` minus everything under `/sys/devices/virtual/block`.
    fn physical_devices(&self) -> Result<HashSet<String>, CollectError> {
        let all: HashSet<String> = self
            .fs
            .read_dir_names(Path::new(&format!("{}/block", self.sys_path)))?
            .into_iter()
            .collect();
        let virtual_blocks: HashSet<String> = self
            .fs
            .read_dir_names(Path::new(&format!(
                "{}/devices/virtual/block",
                self.sys_path
            )))?
            .into_iter()
            .collect();
        Ok(&all - &virtual_blocks)
    }
}
