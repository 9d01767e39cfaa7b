//! hostmon — single-host resource-utilization sampling engine.
//!
//! Collects point-in-time CPU, memory, disk-I/O, and network-I/O
//! metrics behind one driver contract, regardless of which backend
//! does the raw sampling:
//!
//! - `collector` — filesystem seam, raw kernel-interface readers, mocks
//! - `model` — immutable counter snapshots per metric family
//! - `delta` — cumulative-counter → per-interval delta engine
//! - `metrics` — the assembled record plus rate/unit post-processing
//! - `driver` — the [`HostDriver`] contract, the two backends, and the
//!   backend selector
//!
//! Sampling is synchronous and pull-based: every value is produced
//! inside the call that requested it, and periodicity belongs to the
//! embedding scheduler. The crate emits `tracing` events but never
//! installs a subscriber.
//!
//! ```no_run
//! use hostmon::driver::{DriverKind, HostDriver, SampleOptions, select_driver};
//!
//! let mut driver = select_driver(DriverKind::Auto)?.build();
//! let record = driver.metrics(&SampleOptions::default())?;
//! for (name, value) in record.iter() {
//!     println!("{name} = {value}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collector;
pub mod delta;
pub mod driver;
pub mod metrics;
pub mod model;

pub use driver::{DriverKind, HostDriver, SampleOptions, select_driver};
pub use metrics::{ByteUnit, MetricsRecord};
