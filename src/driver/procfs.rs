//! Direct kernel-interface driver.
//!
//! Samples through [`SystemReader`] and diffs each counter family
//! against the previous snapshot held in the driver's own state. All
//! slots start empty, so the first sample of every family reports a
//! zero delta.

use crate::collector::{FileSystem, RealFs, SystemReader};
use crate::delta::{self, DiskIo, DiskTotals, NetIo};
use crate::driver::{DriverError, HostDriver, SampleClock, SampleOptions, finish_record};
use crate::metrics::MetricsRecord;
use crate::model::{CPU_AGGREGATE, CpuSnapshot, DiskSnapshot, NetSnapshot};

/// Previous-snapshot slots plus the sample clock.
///
/// Owned exclusively by the driver instance and zero-initialized at
/// construction; a family's slot is only replaced after a successful
/// fresh read of that family.
#[derive(Default)]
struct ProcfsState {
    last_cpu: Option<CpuSnapshot>,
    last_net: Option<NetSnapshot>,
    last_disk: Option<DiskSnapshot>,
    clock: SampleClock,
}

/// Host monitor driver backed by direct `/proc` and `/sys` parsing.
pub struct ProcfsDriver<F: FileSystem> {
    reader: SystemReader<F>,
    state: ProcfsState,
}

impl ProcfsDriver<RealFs> {
    /// Driver over the real kernel interfaces.
    pub fn new() -> Self {
        Self::with_reader(SystemReader::new(RealFs::new()))
    }
}

impl Default for ProcfsDriver<RealFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> ProcfsDriver<F> {
    /// Driver over an injected reader (custom roots, mock filesystem).
    pub fn with_reader(reader: SystemReader<F>) -> Self {
        Self {
            reader,
            state: ProcfsState::default(),
        }
    }
}

impl<F: FileSystem> HostDriver for ProcfsDriver<F> {
    fn vmem_total(&mut self) -> Result<u64, DriverError> {
        Ok(self.reader.read_meminfo()?.total_bytes())
    }

    fn vmem_used(&mut self) -> Result<u64, DriverError> {
        Ok(self.reader.read_meminfo()?.used_bytes())
    }

    fn vcore_num(&mut self) -> Result<usize, DriverError> {
        Ok(self.reader.read_cpu()?.core_count())
    }

    fn cpu_percent(&mut self, core: &str) -> Result<f64, DriverError> {
        let snap = self.reader.read_cpu()?;
        let curr = snap
            .get(core)
            .ok_or_else(|| DriverError::UnknownCore(core.to_string()))?;
        let prev = self.state.last_cpu.as_ref().and_then(|s| s.get(core));

        let percent = delta::cpu_percent(curr, prev);
        self.state.last_cpu = Some(snap);
        Ok(percent)
    }

    fn disk_io(&mut self) -> Result<DiskIo, DriverError> {
        let snap = self.reader.read_diskstats()?;
        let curr = DiskTotals {
            read_bytes: snap.read_bytes(None),
            write_bytes: snap.write_bytes(None),
        };
        let prev = self.state.last_disk.as_ref().map(|s| DiskTotals {
            read_bytes: s.read_bytes(None),
            write_bytes: s.write_bytes(None),
        });

        let io = delta::disk_io_delta(&curr, prev.as_ref());
        self.state.last_disk = Some(snap);
        Ok(io)
    }

    fn net_io(&mut self) -> Result<NetIo, DriverError> {
        let snap = self.reader.read_net_dev()?;
        let curr = snap.totals(None);
        let prev = self.state.last_net.as_ref().map(|s| s.totals(None));

        let io = delta::net_io_delta(&curr, prev.as_ref());
        self.state.last_net = Some(snap);
        Ok(io)
    }

    /// One sampling cycle. `cpu_interval` is ignored here: CPU usage
    /// comes from diffing the stored `/proc/stat` snapshot, not from a
    /// measurement window.
    fn metrics(&mut self, options: &SampleOptions) -> Result<MetricsRecord, DriverError> {
        let cpu = self.cpu_percent(CPU_AGGREGATE)?;
        let disk = self.disk_io()?;
        let net = self.net_io()?;
        let memory_used = self.vmem_used()?;
        let elapsed = self.state.clock.tick();

        Ok(finish_record(memory_used, cpu, disk, net, elapsed, options))
    }
}
