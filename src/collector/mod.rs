//! Acquisition layer: filesystem seam, raw counter readers, and mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                       Driver                           │
//! │   ┌────────────────────────────────────────────────┐   │
//! │   │              SystemReader                      │   │
//! │   │  - /proc/stat        (CPU time slices)         │   │
//! │   │  - /proc/meminfo     (memory levels)           │   │
//! │   │  - /proc/net/dev     (per-interface counters)  │   │
//! │   │  - /proc/diskstats   (per-device counters)     │   │
//! │   │  - /sys/block ∖ virtual (physical device set)  │   │
//! │   │  - /etc/fstab        (mount table)             │   │
//! │   └──────────────────────┬─────────────────────────┘   │
//! │                          │                             │
//! │                   ┌──────▼──────┐                      │
//! │                   │  FileSystem │ (trait)              │
//! │                   └──────┬──────┘                      │
//! └──────────────────────────┼─────────────────────────────┘
//!                ┌───────────┼───────────┐
//!                │           │           │
//!         ┌──────▼─────┐ ┌───▼────┐ ┌────▼──────┐
//!         │   RealFs   │ │ MockFs │ │ Scenarios │
//!         │  (Linux)   │ │ (Test) │ │ (Fixtures)│
//!         └────────────┘ └────────┘ └───────────┘
//! ```
//!
//! Readers are stateless: each `read_*` call is one synchronous pass
//! over its interface file yielding an immutable snapshot. The driver
//! layer owns all history (previous snapshots, sample clock).

pub mod mock;
pub mod procfs;
pub mod traits;

pub use mock::{MockFs, SharedFs};
pub use procfs::{CollectError, ParseError, SystemReader};
pub use traits::{FileSystem, RealFs};
