//! Library-backed driver delegating raw sampling to `sysinfo`.
//!
//! The library already tracks cumulative disk and network counters;
//! this driver diffs those counters with the same delta engine the
//! procfs backend uses, so the two backends share identical delta and
//! rate semantics even though their raw sources differ.

use crate::delta::{self, DiskIo, DiskTotals, NetIo};
use crate::driver::{
    DEFAULT_CPU_INTERVAL, DriverError, HostDriver, SampleClock, SampleOptions, finish_record,
};
use crate::metrics::MetricsRecord;
use crate::model::{CPU_AGGREGATE, NetTotals};
use std::time::Duration;

/// Previous cumulative totals plus the sample clock. Zero-initialized
/// at construction, so the first delta of each family is zero.
#[derive(Default)]
struct SysinfoState {
    last_disk: Option<DiskTotals>,
    last_net: Option<NetTotals>,
    clock: SampleClock,
}

/// Host monitor driver backed by the `sysinfo` crate.
///
/// CPU usage is measured over a window: the library needs two usage
/// refreshes separated by at least
/// [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`], so `cpu_percent` blocks
/// for the configured interval the way the direct backend never does.
pub struct SysinfoDriver {
    system: sysinfo::System,
    networks: sysinfo::Networks,
    disks: sysinfo::Disks,
    cpu_interval: Duration,
    state: SysinfoState,
}

impl SysinfoDriver {
    pub fn new() -> Self {
        Self {
            system: sysinfo::System::new_all(),
            networks: sysinfo::Networks::new_with_refreshed_list(),
            disks: sysinfo::Disks::new_with_refreshed_list(),
            cpu_interval: DEFAULT_CPU_INTERVAL,
            state: SysinfoState::default(),
        }
    }

    /// Overrides the CPU measurement window used by `cpu_percent`.
    pub fn with_cpu_interval(mut self, interval: Duration) -> Self {
        self.cpu_interval = interval;
        self
    }

    fn cpu_percent_over(&mut self, core: &str, interval: Duration) -> Result<f64, DriverError> {
        self.system.refresh_cpu_usage();
        std::thread::sleep(interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_usage();

        if core == CPU_AGGREGATE {
            return Ok(self.system.global_cpu_usage() as f64);
        }
        let index: usize = core
            .strip_prefix(CPU_AGGREGATE)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| DriverError::UnknownCore(core.to_string()))?;
        let cpu = self
            .system
            .cpus()
            .get(index)
            .ok_or_else(|| DriverError::UnknownCore(core.to_string()))?;
        Ok(cpu.cpu_usage() as f64)
    }

    fn disk_totals(&mut self) -> DiskTotals {
        self.disks.refresh(true);
        let mut totals = DiskTotals::default();
        for disk in self.disks.list() {
            let usage = disk.usage();
            totals.read_bytes += usage.total_read_bytes;
            totals.write_bytes += usage.total_written_bytes;
        }
        totals
    }

    fn net_totals(&mut self) -> NetTotals {
        self.networks.refresh(true);
        let mut totals = NetTotals::default();
        for data in self.networks.list().values() {
            totals.rec_bytes += data.total_received();
            totals.rec_packets += data.total_packets_received();
            totals.tra_bytes += data.total_transmitted();
            totals.tra_packets += data.total_packets_transmitted();
        }
        totals
    }
}

impl Default for SysinfoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDriver for SysinfoDriver {
    fn vmem_total(&mut self) -> Result<u64, DriverError> {
        self.system.refresh_memory();
        Ok(self.system.total_memory())
    }

    fn vmem_used(&mut self) -> Result<u64, DriverError> {
        self.system.refresh_memory();
        Ok(self.system.used_memory())
    }

    fn vcore_num(&mut self) -> Result<usize, DriverError> {
        Ok(self.system.cpus().len())
    }

    fn cpu_percent(&mut self, core: &str) -> Result<f64, DriverError> {
        let interval = self.cpu_interval;
        self.cpu_percent_over(core, interval)
    }

    fn disk_io(&mut self) -> Result<DiskIo, DriverError> {
        let curr = self.disk_totals();
        let io = delta::disk_io_delta(&curr, self.state.last_disk.as_ref());
        self.state.last_disk = Some(curr);
        Ok(io)
    }

    fn net_io(&mut self) -> Result<NetIo, DriverError> {
        let curr = self.net_totals();
        let io = delta::net_io_delta(&curr, self.state.last_net.as_ref());
        self.state.last_net = Some(curr);
        Ok(io)
    }

    fn metrics(&mut self, options: &SampleOptions) -> Result<MetricsRecord, DriverError> {
        let cpu = self.cpu_percent_over(CPU_AGGREGATE, options.cpu_interval)?;
        let disk = self.disk_io()?;
        let net = self.net_io()?;
        let memory_used = self.vmem_used()?;
        let elapsed = self.state.clock.tick();

        Ok(finish_record(memory_used, cpu, disk, net, elapsed, options))
    }
}
