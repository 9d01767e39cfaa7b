//! Parsers for the kernel interface files the readers consume.
//!
//! These are pure functions from file content to snapshot types. They
//! never touch the filesystem, which keeps them testable with string
//! fixtures. Column positions are fixed by the kernel formats:
//!
//! - `/proc/stat`: label + 7 consumed time fields per cpu line
//! - `/proc/meminfo`: `Key: value kB` table
//! - `/proc/net/dev`: 2 header lines, then name + 16 counters per line
//! - `/proc/diskstats`: major minor name + 11+ counters per line
//! - `/etc/fstab`: 6 whitespace-separated fields per record

use crate::model::{
    CpuSnapshot, CpuTimes, DeviceCounters, InterfaceCounters, MemorySnapshot, MountEntry,
    NetSnapshot,
};

/// Error type for lines that do not match the expected fixed-column shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

fn parse_u64(token: &str, what: &str, line: &str) -> Result<u64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {what} {token:?} in line {line:?}")))
}

/// Parses `/proc/stat` content into a CPU snapshot.
///
/// Consumes every line whose label starts with `cpu`: the aggregate
/// line first, then one line per logical core. Each line must carry at
/// least 7 integer time fields; extra columns (steal, guest, ...) are
/// ignored.
pub fn parse_stat(content: &str) -> Result<CpuSnapshot, ParseError> {
    let mut cpus = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&label) = parts.first() else {
            continue;
        };
        if !label.starts_with("cpu") {
            continue;
        }
        if parts.len() < 8 {
            return Err(ParseError::new(format!(
                "cpu line has {} fields, expected 7+: {line:?}",
                parts.len().saturating_sub(1)
            )));
        }

        cpus.push(CpuTimes {
            name: label.to_string(),
            user: parse_u64(parts[1], "user", line)?,
            nice: parse_u64(parts[2], "nice", line)?,
            system: parse_u64(parts[3], "system", line)?,
            idle: parse_u64(parts[4], "idle", line)?,
            iowait: parse_u64(parts[5], "iowait", line)?,
            irq: parse_u64(parts[6], "irq", line)?,
            softirq: parse_u64(parts[7], "softirq", line)?,
        });
    }

    if cpus.is_empty() {
        return Err(ParseError::new("no cpu lines in stat content"));
    }

    Ok(CpuSnapshot { cpus })
}

/// Parses `/proc/meminfo` content.
///
/// `MemTotal` and `MemFree` are required; the other consumed keys
/// default to zero when absent. Values are kept in the kernel's native
/// kilobytes.
pub fn parse_meminfo(content: &str) -> Result<MemorySnapshot, ParseError> {
    let mut snap = MemorySnapshot::default();
    let mut seen_total = false;
    let mut seen_free = false;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let key = key.trim_end_matches(':');
        let slot = match key {
            "MemTotal" => {
                seen_total = true;
                &mut snap.total_kb
            }
            "MemFree" => {
                seen_free = true;
                &mut snap.free_kb
            }
            "MemAvailable" => &mut snap.available_kb,
            "Buffers" => &mut snap.buffers_kb,
            "Cached" => &mut snap.cached_kb,
            "SwapTotal" => &mut snap.swap_total_kb,
            "SwapFree" => &mut snap.swap_free_kb,
            _ => continue,
        };
        *slot = parse_u64(value, key, line)?;
    }

    if !seen_total || !seen_free {
        return Err(ParseError::new("meminfo is missing MemTotal or MemFree"));
    }

    Ok(snap)
}

/// Parses `/proc/net/dev` content.
///
/// The first 2 lines are a fixed header and are skipped unconditionally.
/// Each remaining line is whitespace-split with the interface name (and
/// trailing colon) in column 0, receive bytes/packets in columns 1-2,
/// and transmit bytes/packets in columns 9-10.
pub fn parse_net_dev(content: &str) -> Result<NetSnapshot, ParseError> {
    let mut interfaces = Vec::new();

    for line in content.lines().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 11 {
            return Err(ParseError::new(format!(
                "net dev line has {} columns, expected 11+: {line:?}",
                parts.len()
            )));
        }

        interfaces.push(InterfaceCounters {
            name: parts[0].trim_end_matches(':').to_string(),
            rec_bytes: parse_u64(parts[1], "rec_bytes", line)?,
            rec_packets: parse_u64(parts[2], "rec_packets", line)?,
            tra_bytes: parse_u64(parts[9], "tra_bytes", line)?,
            tra_packets: parse_u64(parts[10], "tra_packets", line)?,
        });
    }

    Ok(NetSnapshot { interfaces })
}

/// Parses `/proc/diskstats` content into per-device counters.
///
/// Column 2 is the device name, column 5 sectors read, column 9
/// sectors written. The physical-device restriction is applied by the
/// reader, not here.
pub fn parse_diskstats(content: &str) -> Result<Vec<DeviceCounters>, ParseError> {
    let mut devices = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            return Err(ParseError::new(format!(
                "diskstats line has {} columns, expected 10+: {line:?}",
                parts.len()
            )));
        }

        devices.push(DeviceCounters {
            name: parts[2].to_string(),
            sectors_read: parse_u64(parts[5], "sectors_read", line)?,
            sectors_written: parse_u64(parts[9], "sectors_written", line)?,
        });
    }

    Ok(devices)
}

/// Filesystem types excluded from the mount table.
const FSTAB_SKIP_TYPES: [&str; 2] = ["swap", "none"];

/// Parses `/etc/fstab` content.
///
/// Comment and blank lines are skipped; every record line must carry
/// the 6 fstab fields. Entries whose filesystem type is `swap` or
/// `none` are dropped.
pub fn parse_fstab(content: &str) -> Result<Vec<MountEntry>, ParseError> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(ParseError::new(format!(
                "fstab line has {} fields, expected 6: {line:?}",
                parts.len()
            )));
        }
        if FSTAB_SKIP_TYPES.contains(&parts[2]) {
            continue;
        }

        entries.push(MountEntry {
            spec: parts[0].to_string(),
            mount_point: parts[1].to_string(),
            fs_type: parts[2].to_string(),
            options: parts[3].to_string(),
            dump: parse_u64(parts[4], "dump", line)? as u32,
            pass: parse_u64(parts[5], "pass", line)? as u32,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stat_aggregate_and_cores() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0
ctxt 500000
btime 1700000000
";
        let snap = parse_stat(content).unwrap();

        assert_eq!(snap.cpus.len(), 3);
        assert_eq!(snap.cpus[0].name, "cpu");
        assert_eq!(snap.cpus[0].user, 10000);
        assert_eq!(snap.cpus[0].softirq, 100);
        assert_eq!(snap.cpus[1].name, "cpu0");
        assert_eq!(snap.core_count(), 2);
    }

    #[test]
    fn parse_stat_consumes_only_seven_fields() {
        // steal/guest columns present but ignored
        let snap = parse_stat("cpu 100 0 50 800 20 0 0 999 999 999\n").unwrap();
        assert_eq!(snap.cpus[0].total(), 970);
    }

    #[test]
    fn parse_stat_rejects_short_line() {
        let err = parse_stat("cpu 1 2 3\n").unwrap_err();
        assert!(err.message.contains("expected 7+"));
    }

    #[test]
    fn parse_stat_rejects_non_integer_field() {
        assert!(parse_stat("cpu 1 2 3 x 5 6 7\n").is_err());
    }

    #[test]
    fn parse_stat_rejects_empty_content() {
        assert!(parse_stat("ctxt 500\n").is_err());
    }

    #[test]
    fn parse_meminfo_required_and_optional_keys() {
        let content = "\
MemTotal:       8000000 kB
MemFree:        2000000 kB
MemAvailable:   4000000 kB
Buffers:         512000 kB
Cached:         1024000 kB
SwapCached:           0 kB
SwapTotal:      4096000 kB
SwapFree:       4096000 kB
Dirty:              100 kB
";
        let snap = parse_meminfo(content).unwrap();

        assert_eq!(snap.total_kb, 8_000_000);
        assert_eq!(snap.free_kb, 2_000_000);
        assert_eq!(snap.available_kb, 4_000_000);
        assert_eq!(snap.buffers_kb, 512_000);
        assert_eq!(snap.cached_kb, 1_024_000);
        assert_eq!(snap.swap_total_kb, 4_096_000);
        assert_eq!(snap.used_bytes(), 6_000_000 * 1024);
    }

    #[test]
    fn parse_meminfo_missing_memfree_is_error() {
        let err = parse_meminfo("MemTotal: 8000000 kB\n").unwrap_err();
        assert!(err.message.contains("MemFree"));
    }

    #[test]
    fn parse_net_dev_fixed_columns() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0: 1000 10 0 0 0 0 0 0 500 5 0 0 0 0 0 0
";
        let snap = parse_net_dev(content).unwrap();

        assert_eq!(snap.interfaces.len(), 1);
        let eth0 = &snap.interfaces[0];
        assert_eq!(eth0.name, "eth0");
        assert_eq!(eth0.rec_bytes, 1000);
        assert_eq!(eth0.rec_packets, 10);
        assert_eq!(eth0.tra_bytes, 500);
        assert_eq!(eth0.tra_packets, 5);
    }

    #[test]
    fn parse_net_dev_skips_exactly_two_header_lines() {
        // A third line that looked like a header would be a real
        // interface named "face", so only the first two are dropped.
        let content = "\
header one
header two
    lo: 100 1 0 0 0 0 0 0 100 1 0 0 0 0 0 0
  eth0: 9000 90 0 0 0 0 0 0 7000 70 0 0 0 0 0 0
";
        let snap = parse_net_dev(content).unwrap();
        assert_eq!(snap.interfaces.len(), 2);
        assert_eq!(snap.interfaces[0].name, "lo");
        assert_eq!(snap.interfaces[1].tra_bytes, 7000);
    }

    #[test]
    fn parse_net_dev_rejects_short_line() {
        let content = "h1\nh2\neth0: 1 2 3\n";
        let err = parse_net_dev(content).unwrap_err();
        assert!(err.message.contains("expected 11+"));
    }

    #[test]
    fn parse_diskstats_fixed_columns() {
        let content = "\
   8       0 sda 47451 241465 3269363 21050 67032 315959 62942464 76693 0 240 7878
   8       1 sda1 215 0 52985 168 10 0 4168 70 0 153 238
 253       0 dm-0 8768 0 959977 11319 71944 0 60446768 782378 0 15658 793769
";
        let devices = parse_diskstats(content).unwrap();

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].name, "sda");
        assert_eq!(devices[0].sectors_read, 3269363);
        assert_eq!(devices[0].sectors_written, 62942464);
        assert_eq!(devices[2].name, "dm-0");
        assert_eq!(devices[2].sectors_written, 60446768);
    }

    #[test]
    fn parse_diskstats_rejects_malformed_line() {
        assert!(parse_diskstats("8 0 sda 1 2\n").is_err());
    }

    #[test]
    fn parse_fstab_skips_comments_swap_and_none() {
        let content = "\
# Created by anaconda
#
/dev/mapper/centos-root /                       xfs     defaults        0 0
UUID=e7d3d212 /boot                   xfs     defaults        1 2
/dev/mapper/centos-swap swap                    swap    defaults        0 0
tmpfs /tmp none defaults 0 0
";
        let entries = parse_fstab(content).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].spec, "/dev/mapper/centos-root");
        assert_eq!(entries[0].mount_point, "/");
        assert_eq!(entries[0].fs_type, "xfs");
        assert_eq!(entries[1].dump, 1);
        assert_eq!(entries[1].pass, 2);
    }

    #[test]
    fn parse_fstab_rejects_truncated_record() {
        let err = parse_fstab("/dev/sda1 / ext4 defaults\n").unwrap_err();
        assert!(err.message.contains("expected 6"));
    }
}
