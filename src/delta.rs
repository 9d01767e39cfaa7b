//! Counter-delta engine.
//!
//! This module is the single source of truth for turning two temporally
//! ordered readings of a cumulative counter family into per-interval
//! activity. Both driver backends delegate here, which is what keeps
//! their delta semantics identical.
//!
//! Boundary policy: when there is no previous reading (the first sample
//! of a freshly constructed driver), every delta is zero. That is a
//! defined result, not an error.
//!
//! Discontinuity policy: a negative delta (counter reset, device
//! replacement, wraparound) is logged and passed through unchanged.
//! Downstream consumers must treat negative delta/rate values as a
//! discontinuity signal, never as a valid decrease.

use crate::model::{CpuTimes, NetTotals};
use serde::{Deserialize, Serialize};

/// Signed difference of one cumulative counter.
///
/// Negative results are flagged with a `warn` event and propagated.
pub fn counter_delta(counter: &'static str, curr: u64, prev: u64) -> i64 {
    let delta = curr as i64 - prev as i64;
    if delta < 0 {
        tracing::warn!(
            counter,
            curr,
            prev,
            "cumulative counter went backwards; passing negative delta through"
        );
    }
    delta
}

/// Cumulative disk byte counters summed over the physical devices.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct DiskTotals {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Per-interval disk activity.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct DiskIo {
    pub read_bytes: i64,
    pub write_bytes: i64,
}

/// Per-interval network activity.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct NetIo {
    pub sent_bytes: i64,
    pub receive_bytes: i64,
}

/// Disk activity between two cumulative readings.
pub fn disk_io_delta(curr: &DiskTotals, prev: Option<&DiskTotals>) -> DiskIo {
    let Some(prev) = prev else {
        return DiskIo::default();
    };
    DiskIo {
        read_bytes: counter_delta("disk_read_bytes", curr.read_bytes, prev.read_bytes),
        write_bytes: counter_delta("disk_write_bytes", curr.write_bytes, prev.write_bytes),
    }
}

/// Network activity between two cumulative readings.
pub fn net_io_delta(curr: &NetTotals, prev: Option<&NetTotals>) -> NetIo {
    let Some(prev) = prev else {
        return NetIo::default();
    };
    NetIo {
        sent_bytes: counter_delta("net_send_bytes", curr.tra_bytes, prev.tra_bytes),
        receive_bytes: counter_delta("net_receive_bytes", curr.rec_bytes, prev.rec_bytes),
    }
}

/// Busy percentage of one CPU line between two readings.
///
/// `100 − Δidle/Δtotal·100`, where Δtotal is the delta of the sum of
/// all 7 time fields. Δtotal of zero (two samples in the same scheduler
/// tick) and a missing previous reading both yield exactly `0.0`.
pub fn cpu_percent(curr: &CpuTimes, prev: Option<&CpuTimes>) -> f64 {
    let Some(prev) = prev else {
        return 0.0;
    };
    let delta_idle = curr.idle as i64 - prev.idle as i64;
    let delta_total = curr.total() as i64 - prev.total() as i64;
    if delta_total == 0 {
        return 0.0;
    }
    100.0 - (delta_idle as f64 * 100.0 / delta_total as f64)
}
