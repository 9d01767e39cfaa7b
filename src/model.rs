//! Snapshot types for the counter families sampled from the host.
//!
//! Each snapshot is an immutable, fully-parsed reading of one kernel
//! interface at a single instant. Snapshots carry cumulative counters;
//! turning them into per-interval activity is the job of [`crate::delta`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bytes per disk sector unless a reader is configured otherwise.
pub const DEFAULT_SECTOR_SIZE: u64 = 512;

/// Label of the aggregate (all-cores) line in `/proc/stat`.
pub const CPU_AGGREGATE: &str = "cpu";

/// Cumulative CPU time counters for one `/proc/stat` line.
///
/// Source: `/proc/stat`
///
/// Values are jiffies (clock ticks) accumulated since boot. Only the
/// first 7 time fields are consumed; steal/guest columns are ignored.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuTimes {
    /// Line label: `cpu` for the aggregate, `cpu0`, `cpu1`, ... per core.
    pub name: String,

    /// Time spent in user mode (jiffies).
    /// Source: `/proc/stat` column 1
    pub user: u64,

    /// Time spent in user mode with low priority (jiffies).
    /// Source: `/proc/stat` column 2
    pub nice: u64,

    /// Time spent in system/kernel mode (jiffies).
    /// Source: `/proc/stat` column 3
    pub system: u64,

    /// Time spent idle (jiffies).
    /// Source: `/proc/stat` column 4
    pub idle: u64,

    /// Time waiting for I/O to complete (jiffies).
    /// Source: `/proc/stat` column 5
    pub iowait: u64,

    /// Time servicing hardware interrupts (jiffies).
    /// Source: `/proc/stat` column 6
    pub irq: u64,

    /// Time servicing software interrupts (jiffies).
    /// Source: `/proc/stat` column 7
    pub softirq: u64,
}

impl CpuTimes {
    /// Sum of all 7 consumed time fields.
    pub fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.iowait + self.irq + self.softirq
    }
}

/// One sampling of every CPU line in `/proc/stat`: the aggregate line
/// plus one line per logical core.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuSnapshot {
    pub cpus: Vec<CpuTimes>,
}

impl CpuSnapshot {
    /// Looks up a line by label (`"cpu"`, `"cpu0"`, ...).
    pub fn get(&self, name: &str) -> Option<&CpuTimes> {
        self.cpus.iter().find(|c| c.name == name)
    }

    /// Number of logical cores: every line whose label is not the
    /// literal aggregate label. A real core named `cpu` would be
    /// undercounted; the kernel never does that.
    pub fn core_count(&self) -> usize {
        self.cpus.iter().filter(|c| c.name != CPU_AGGREGATE).count()
    }
}

/// Point-in-time memory levels from `/proc/meminfo`.
///
/// All values are kilobytes as reported by the kernel; callers rescale
/// to bytes. Memory is a level, not a cumulative counter, so it has no
/// delta lifecycle.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemorySnapshot {
    /// Total usable RAM (kB). Source: `MemTotal`
    pub total_kb: u64,
    /// Free memory (kB). Source: `MemFree`
    pub free_kb: u64,
    /// Estimate of memory available for new workloads (kB). Source: `MemAvailable`
    pub available_kb: u64,
    /// Block-device buffer memory (kB). Source: `Buffers`
    pub buffers_kb: u64,
    /// Page-cache memory (kB). Source: `Cached`
    pub cached_kb: u64,
    /// Total swap (kB). Source: `SwapTotal`
    pub swap_total_kb: u64,
    /// Free swap (kB). Source: `SwapFree`
    pub swap_free_kb: u64,
}

impl MemorySnapshot {
    /// Total memory in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.total_kb * 1024
    }

    /// Used memory in bytes, counted as total minus free.
    pub fn used_bytes(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb) * 1024
    }
}

/// Cumulative traffic counters for one network interface.
///
/// Source: `/proc/net/dev`, one line per interface.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct InterfaceCounters {
    /// Interface name (`eth0`, `lo`, ...), colon stripped.
    pub name: String,
    /// Bytes received since boot.
    pub rec_bytes: u64,
    /// Packets received since boot.
    pub rec_packets: u64,
    /// Bytes transmitted since boot.
    pub tra_bytes: u64,
    /// Packets transmitted since boot.
    pub tra_packets: u64,
}

/// Summed traffic counters across one or all interfaces.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct NetTotals {
    pub rec_bytes: u64,
    pub rec_packets: u64,
    pub tra_bytes: u64,
    pub tra_packets: u64,
}

/// One sampling of `/proc/net/dev`: cumulative counters per interface.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct NetSnapshot {
    pub interfaces: Vec<InterfaceCounters>,
}

impl NetSnapshot {
    /// Looks up one interface by name.
    pub fn get(&self, name: &str) -> Option<&InterfaceCounters> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Sums counters over all interfaces, or over the single named
    /// interface when `iface` is given. An unknown name sums nothing.
    pub fn totals(&self, iface: Option<&str>) -> NetTotals {
        let mut totals = NetTotals::default();
        for i in &self.interfaces {
            if let Some(name) = iface
                && i.name != name
            {
                continue;
            }
            totals.rec_bytes += i.rec_bytes;
            totals.rec_packets += i.rec_packets;
            totals.tra_bytes += i.tra_bytes;
            totals.tra_packets += i.tra_packets;
        }
        totals
    }
}

/// Cumulative sector counters for one block device.
///
/// Source: `/proc/diskstats` (device name column 2, sectors read
/// column 5, sectors written column 9).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DeviceCounters {
    /// Device name (`sda`, `nvme0n1`, `dm-0`, ...).
    pub name: String,
    /// Sectors read since boot.
    pub sectors_read: u64,
    /// Sectors written since boot.
    pub sectors_written: u64,
}

/// One sampling of `/proc/diskstats` plus the set of physical devices.
///
/// `physical` is the set-difference of `/sys/block` against
/// `/sys/devices/virtual/block`, so device-mapper and other virtual
/// volumes are not double-counted against their backing disks in the
/// aggregate totals.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DiskSnapshot {
    pub devices: Vec<DeviceCounters>,
    pub physical: HashSet<String>,
    pub sector_size: u64,
}

impl Default for DiskSnapshot {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            physical: HashSet::new(),
            sector_size: DEFAULT_SECTOR_SIZE,
        }
    }
}

impl DiskSnapshot {
    /// Looks up one device by name.
    pub fn get(&self, name: &str) -> Option<&DeviceCounters> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Cumulative bytes read: one named device, or all physical devices.
    pub fn read_bytes(&self, device: Option<&str>) -> u64 {
        self.sum_sectors(device, |d| d.sectors_read) * self.sector_size
    }

    /// Cumulative bytes written: one named device, or all physical devices.
    pub fn write_bytes(&self, device: Option<&str>) -> u64 {
        self.sum_sectors(device, |d| d.sectors_written) * self.sector_size
    }

    fn sum_sectors(&self, device: Option<&str>, field: impl Fn(&DeviceCounters) -> u64) -> u64 {
        match device {
            Some(name) => self.get(name).map(&field).unwrap_or(0),
            None => self
                .devices
                .iter()
                .filter(|d| self.physical.contains(&d.name))
                .map(&field)
                .sum(),
        }
    }
}

/// One record of the system mount table.
///
/// Source: `/etc/fstab`, 6 whitespace-separated fields per non-comment
/// line. Entries of type `swap` or `none` are dropped by the reader.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MountEntry {
    /// Block device, UUID=... reference, or remote filesystem spec.
    pub spec: String,
    /// Mount point path.
    pub mount_point: String,
    /// Filesystem type (`ext4`, `xfs`, ...).
    pub fs_type: String,
    /// Mount options string.
    pub options: String,
    /// Dump flag (field 5).
    pub dump: u32,
    /// fsck pass number (field 6).
    pub pass: u32,
}
