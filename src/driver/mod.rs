//! Host monitor drivers: one capability contract, two backends.
//!
//! A driver owns the mutable sampling state (previous snapshot per
//! counter family plus the sample clock) and assembles a
//! [`MetricsRecord`] per cycle. The two implementations are
//! substitutable: [`ProcfsDriver`] parses the kernel interfaces
//! directly, [`SysinfoDriver`] delegates raw sampling to the `sysinfo`
//! library, and both run the same delta engine so their records carry
//! identical field names and unit conventions.
//!
//! Drivers are single-caller: state is mutated in place with no
//! synchronization, so confine an instance to one logical caller and
//! give concurrent callers their own instances (each then keeps its own
//! delta baseline).

use crate::collector::CollectError;
use crate::delta::{DiskIo, NetIo};
use crate::metrics::{ByteUnit, MetricsRecord};
use std::time::{Duration, Instant};

pub mod manager;
pub mod procfs;
#[cfg(feature = "sysinfo-driver")]
pub mod sysinfo;

pub use manager::{DriverKind, SelectError, SelectedDriver, select_driver};
pub use procfs::ProcfsDriver;
#[cfg(feature = "sysinfo-driver")]
pub use self::sysinfo::SysinfoDriver;

/// Default CPU measurement window for `metrics`.
pub const DEFAULT_CPU_INTERVAL: Duration = Duration::from_secs(1);

/// Error from a driver sampling call.
///
/// A failed call aborts the current cycle; the driver's stored
/// snapshots are only replaced after a successful fresh read, so the
/// next call diffs against the last good baseline.
#[derive(Debug)]
pub enum DriverError {
    /// Kernel interface file missing, unreadable, or permission-denied.
    Io(std::io::Error),
    /// Interface content did not match the expected shape.
    Parse(String),
    /// The requested CPU core label does not exist on this host.
    UnknownCore(String),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::Io(e) => write!(f, "I/O error: {}", e),
            DriverError::Parse(msg) => write!(f, "parse error: {}", msg),
            DriverError::UnknownCore(core) => write!(f, "unknown cpu core {:?}", core),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<CollectError> for DriverError {
    fn from(e: CollectError) -> Self {
        match e {
            CollectError::Io(e) => DriverError::Io(e),
            CollectError::Parse(msg) => DriverError::Parse(msg),
        }
    }
}

/// Options for one `metrics` sampling cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleOptions {
    /// Replace delta fields with per-second rates.
    pub rate: bool,
    /// CPU measurement window, used by backends that measure usage over
    /// an interval rather than diffing stored counters.
    pub cpu_interval: Duration,
    /// Rescale byte-valued fields into this unit.
    pub unit: Option<ByteUnit>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            rate: false,
            cpu_interval: DEFAULT_CPU_INTERVAL,
            unit: None,
        }
    }
}

impl SampleOptions {
    pub fn with_rate(mut self, rate: bool) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_cpu_interval(mut self, interval: Duration) -> Self {
        self.cpu_interval = interval;
        self
    }

    pub fn with_unit(mut self, unit: ByteUnit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// The capability set every host monitor driver satisfies.
///
/// `disk_io` and `net_io` report deltas since the previous call on the
/// same instance; the first call after construction reports zero for
/// every delta-derived value regardless of host activity.
pub trait HostDriver {
    /// Total virtual memory, bytes.
    fn vmem_total(&mut self) -> Result<u64, DriverError>;

    /// Used virtual memory, bytes.
    fn vmem_used(&mut self) -> Result<u64, DriverError>;

    /// Number of logical cores.
    fn vcore_num(&mut self) -> Result<usize, DriverError>;

    /// Busy percentage of the named core since the previous CPU sample.
    /// The aggregate line is labeled [`CPU_AGGREGATE`](crate::model::CPU_AGGREGATE).
    fn cpu_percent(&mut self, core: &str) -> Result<f64, DriverError>;

    /// Disk bytes read/written since the previous call.
    fn disk_io(&mut self) -> Result<DiskIo, DriverError>;

    /// Network bytes sent/received since the previous call.
    fn net_io(&mut self) -> Result<NetIo, DriverError>;

    /// Runs one full sampling cycle and assembles the metrics record.
    fn metrics(&mut self, options: &SampleOptions) -> Result<MetricsRecord, DriverError>;
}

/// Wall-clock state for rate computation: remembers when the previous
/// sampling cycle ran.
#[derive(Debug, Default)]
pub struct SampleClock {
    last: Option<Instant>,
}

impl SampleClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous tick, or `None` on the first.
    pub fn tick(&mut self) -> Option<f64> {
        let now = Instant::now();
        let elapsed = self.last.map(|prev| now.duration_since(prev).as_secs_f64());
        self.last = Some(now);
        elapsed
    }
}

/// Applies the shared post-sampling pipeline: assemble the record, then
/// the optional rate and unit transforms, in that order.
///
/// Both backends terminate `metrics` here, which is what pins down the
/// field-name contract.
pub(crate) fn finish_record(
    memory_used_bytes: u64,
    cpu_percent: f64,
    disk: DiskIo,
    net: NetIo,
    elapsed_secs: Option<f64>,
    options: &SampleOptions,
) -> MetricsRecord {
    let mut record = MetricsRecord::assemble(memory_used_bytes, cpu_percent, disk, net);
    if options.rate {
        record.apply_rate(elapsed_secs);
    }
    if let Some(unit) = options.unit {
        record.apply_unit(unit);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_clock_first_tick_has_no_elapsed() {
        let mut clock = SampleClock::new();
        assert_eq!(clock.tick(), None);

        std::thread::sleep(Duration::from_millis(5));
        let elapsed = clock.tick().unwrap();
        assert!(elapsed > 0.0);
        assert!(elapsed < 10.0);
    }

    #[test]
    fn sample_options_defaults() {
        let opts = SampleOptions::default();
        assert!(!opts.rate);
        assert_eq!(opts.cpu_interval, Duration::from_secs(1));
        assert_eq!(opts.unit, None);
    }

    #[test]
    fn finish_record_applies_rate_then_unit() {
        let disk = DiskIo {
            read_bytes: 2048,
            write_bytes: 0,
        };
        let net = NetIo::default();
        let opts = SampleOptions::default()
            .with_rate(true)
            .with_unit(ByteUnit::Kb);

        let record = finish_record(4096, 10.0, disk, net, Some(2.0), &opts);

        assert_eq!(record.get("disk_read_kb_rate"), Some(1.0));
        assert_eq!(record.get("memory_used_kb"), Some(4.0));
        assert_eq!(record.get("cpu_percent"), Some(10.0));
    }

    #[test]
    fn driver_error_display_names_the_failure() {
        let err = DriverError::UnknownCore("cpu9".into());
        assert!(err.to_string().contains("cpu9"));

        let err: DriverError = CollectError::Parse("bad line".into()).into();
        assert!(matches!(err, DriverError::Parse(_)));
    }
}
