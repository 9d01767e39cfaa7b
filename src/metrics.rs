//! The assembled output of one sampling cycle and its optional
//! post-processing transforms (delta → rate, byte → larger unit).
//!
//! Field names are part of the driver contract: both backends assemble
//! records through [`MetricsRecord::assemble`], so the emitted name set
//! and unit conventions are identical regardless of which backend
//! produced the numbers.

use crate::delta::{DiskIo, NetIo};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Instantaneous memory in use, bytes.
pub const MEMORY_USED_BYTES: &str = "memory_used_bytes";
/// Aggregate CPU busy percentage over the last interval.
pub const CPU_PERCENT: &str = "cpu_percent";
/// Bytes read from physical disks since the previous sample.
pub const DISK_READ_BYTES: &str = "disk_read_bytes";
/// Bytes written to physical disks since the previous sample.
pub const DISK_WRITE_BYTES: &str = "disk_write_bytes";
/// Bytes transmitted over all interfaces since the previous sample.
pub const NET_SEND_BYTES: &str = "net_send_bytes";
/// Bytes received over all interfaces since the previous sample.
pub const NET_RECEIVE_BYTES: &str = "net_receive_bytes";

/// Suffix appended to a field name by the rate transform.
pub const RATE_SUFFIX: &str = "_rate";

/// The delta-valued fields eligible for rate conversion. Levels
/// (memory) and already-normalized values (cpu percent) are not.
const RATE_FIELDS: [&str; 4] = [
    DISK_READ_BYTES,
    DISK_WRITE_BYTES,
    NET_SEND_BYTES,
    NET_RECEIVE_BYTES,
];

pub const ONE_KB: f64 = 1024.0;
pub const ONE_MB: f64 = 1024.0 * 1024.0;

/// Unit to rescale byte-valued fields into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteUnit {
    B,
    Kb,
    Mb,
}

impl ByteUnit {
    fn divisor(self) -> f64 {
        match self {
            ByteUnit::B => 1.0,
            ByteUnit::Kb => ONE_KB,
            ByteUnit::Mb => ONE_MB,
        }
    }

    /// The substring that replaces `bytes` in rescaled field names.
    fn label(self) -> &'static str {
        match self {
            ByteUnit::B => "bytes",
            ByteUnit::Kb => "kb",
            ByteUnit::Mb => "mb",
        }
    }
}

/// Error for an unrecognized unit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl std::fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown byte unit {:?}, expected B, KB or MB", self.0)
    }
}

impl std::error::Error for UnknownUnit {}

impl FromStr for ByteUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "B" => Ok(ByteUnit::B),
            "KB" => Ok(ByteUnit::Kb),
            "MB" => Ok(ByteUnit::Mb),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

/// One sampling cycle's named metric values.
///
/// The record is an ordered field-name → value map rather than a fixed
/// struct because the post-processing transforms rename fields
/// (`disk_read_bytes` → `disk_read_bytes_rate` → `disk_read_kb_rate`).
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct MetricsRecord {
    fields: BTreeMap<String, f64>,
}

impl MetricsRecord {
    /// Assembles the canonical record from one cycle's measurements.
    pub fn assemble(memory_used_bytes: u64, cpu_percent: f64, disk: DiskIo, net: NetIo) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(MEMORY_USED_BYTES.to_string(), memory_used_bytes as f64);
        fields.insert(CPU_PERCENT.to_string(), cpu_percent);
        fields.insert(DISK_READ_BYTES.to_string(), disk.read_bytes as f64);
        fields.insert(DISK_WRITE_BYTES.to_string(), disk.write_bytes as f64);
        fields.insert(NET_SEND_BYTES.to_string(), net.sent_bytes as f64);
        fields.insert(NET_RECEIVE_BYTES.to_string(), net.receive_bytes as f64);
        Self { fields }
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The current field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Converts every rate-eligible delta field into a per-second rate,
    /// renaming it with the `_rate` suffix.
    ///
    /// With no elapsed interval (first sample) or a non-positive one,
    /// the rate is defined as `0`, never a division error.
    pub fn apply_rate(&mut self, elapsed_secs: Option<f64>) {
        for field in RATE_FIELDS {
            let Some(value) = self.fields.remove(field) else {
                continue;
            };
            let rate = match elapsed_secs {
                Some(dt) if dt > 0.0 => value / dt,
                _ => 0.0,
            };
            self.fields.insert(format!("{field}{RATE_SUFFIX}"), rate);
        }
    }

    /// Rescales every byte-valued field by the unit divisor and renames
    /// it to match (`bytes` → `kb`/`mb`). `B` is the identity.
    pub fn apply_unit(&mut self, unit: ByteUnit) {
        if unit == ByteUnit::B {
            return;
        }
        let byte_fields: Vec<String> = self
            .fields
            .keys()
            .filter(|k| k.contains("bytes"))
            .cloned()
            .collect();
        for name in byte_fields {
            if let Some(value) = self.fields.remove(&name) {
                let renamed = name.replace("bytes", unit.label());
                self.fields.insert(renamed, value / unit.divisor());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MetricsRecord {
        MetricsRecord::assemble(
            6_144_000_000,
            54.5,
            DiskIo {
                read_bytes: 1_024_000,
                write_bytes: 512_000,
            },
            NetIo {
                sent_bytes: 250_000,
                receive_bytes: 500_000,
            },
        )
    }

    #[test]
    fn assemble_emits_the_canonical_field_set() {
        let rec = record();
        assert_eq!(
            rec.field_names(),
            vec![
                "cpu_percent",
                "disk_read_bytes",
                "disk_write_bytes",
                "memory_used_bytes",
                "net_receive_bytes",
                "net_send_bytes",
            ]
        );
        assert_eq!(rec.get(DISK_READ_BYTES), Some(1_024_000.0));
        assert_eq!(rec.get(NET_SEND_BYTES), Some(250_000.0));
    }

    #[test]
    fn apply_rate_divides_and_renames_eligible_fields() {
        let mut rec = record();
        rec.apply_rate(Some(2.0));

        assert_eq!(rec.get("disk_read_bytes_rate"), Some(512_000.0));
        assert_eq!(rec.get("net_receive_bytes_rate"), Some(250_000.0));
        assert_eq!(rec.get(DISK_READ_BYTES), None);
        // Levels and percentages are untouched.
        assert_eq!(rec.get(MEMORY_USED_BYTES), Some(6_144_000_000.0));
        assert_eq!(rec.get(CPU_PERCENT), Some(54.5));
    }

    #[test]
    fn apply_rate_without_elapsed_interval_emits_zero() {
        let mut rec = record();
        rec.apply_rate(None);

        for field in [
            "disk_read_bytes_rate",
            "disk_write_bytes_rate",
            "net_send_bytes_rate",
            "net_receive_bytes_rate",
        ] {
            assert_eq!(rec.get(field), Some(0.0), "{field}");
        }
    }

    #[test]
    fn apply_unit_rescales_and_renames_every_byte_field() {
        let mut rec = record();
        rec.apply_unit(ByteUnit::Kb);

        assert_eq!(rec.get("disk_read_kb"), Some(1000.0));
        assert_eq!(rec.get("memory_used_kb"), Some(6_000_000.0));
        assert_eq!(rec.get(MEMORY_USED_BYTES), None);
        assert_eq!(rec.get(CPU_PERCENT), Some(54.5));
    }

    #[test]
    fn apply_unit_b_is_identity() {
        let mut rec = record();
        rec.apply_unit(ByteUnit::B);
        assert_eq!(rec, record());
    }

    #[test]
    fn unit_round_trip_reproduces_byte_values() {
        let mut rec = record();
        rec.apply_unit(ByteUnit::Kb);
        let back = rec.get("disk_read_kb").unwrap() * 1024.0;
        assert_eq!(back, 1_024_000.0);
    }

    #[test]
    fn rate_then_unit_composes_field_names() {
        let mut rec = record();
        rec.apply_rate(Some(4.0));
        rec.apply_unit(ByteUnit::Mb);

        assert_eq!(
            rec.get("disk_read_mb_rate"),
            Some(1_024_000.0 / 4.0 / ONE_MB)
        );
        assert_eq!(rec.get("memory_used_mb"), Some(6_144_000_000.0 / ONE_MB));
        assert!(rec.get("disk_read_bytes").is_none());
        assert!(rec.get("disk_read_bytes_rate").is_none());
    }

    #[test]
    fn unit_parses_case_insensitively() {
        assert_eq!("kb".parse::<ByteUnit>().unwrap(), ByteUnit::Kb);
        assert_eq!("MB".parse::<ByteUnit>().unwrap(), ByteUnit::Mb);
        assert_eq!("b".parse::<ByteUnit>().unwrap(), ByteUnit::B);
        assert!("GB".parse::<ByteUnit>().is_err());
    }

    #[test]
    fn record_serializes_as_a_flat_named_map() {
        let json = serde_json::to_value(record()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        assert_eq!(obj["memory_used_bytes"], 6_144_000_000.0);
        assert_eq!(obj["cpu_percent"], 54.5);
        assert_eq!(obj["net_send_bytes"], 250_000.0);
    }
}
