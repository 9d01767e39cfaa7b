//! Pre-built mock filesystem scenarios.
//!
//! Fixtures give tests a realistic set of kernel-interface contents.
//! `typical_system` is a quiet 4-core host; `typical_system_after_tick`
//! is the same host one sampling interval later with advanced counters,
//! for exercising the counter-delta path of a live driver.

use super::filesystem::MockFs;

impl MockFs {
    /// A quiet 4-core system with one physical disk (`sda`, with one
    /// partition) and one device-mapper volume layered on top.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        8000000 kB
MemFree:         2000000 kB
MemAvailable:    4000000 kB
Buffers:          512000 kB
Cached:          1024000 kB
SwapCached:            0 kB
Active:          3000000 kB
Inactive:        1500000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
",
        );

        fs.add_file(
            "/proc/net/dev",
            "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:   50000      500    0    0    0     0          0         0    50000      500    0    0    0     0       0          0
  eth0: 1000000    10000    0    0    0     0          0         0   600000     6000    0    0    0     0       0          0
",
        );

        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 12345 100 1000000 5000 6789 50 500000 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500 0 0 0 0
 253       0 dm-0 8768 0 600000 11319 7194 0 300000 7823 0 15658 79376 0 0 0 0
",
        );

        fs.add_dir("/sys/block/sda");
        fs.add_dir("/sys/block/dm-0");
        fs.add_dir("/sys/devices/virtual/block/dm-0");

        fs.add_file(
            "/etc/fstab",
            "\
# /etc/fstab
/dev/mapper/vg-root /     xfs  defaults 0 0
UUID=e7d3d212       /boot xfs  defaults 1 2
/dev/mapper/vg-swap swap  swap defaults 0 0
",
        );

        fs
    }

    /// [`typical_system`](MockFs::typical_system) one interval later.
    ///
    /// Counter movement between the two fixtures:
    /// - aggregate cpu: Δuser=100, Δsystem=60, Δidle=800, Δiowait=20
    ///   (Δtotal=980, busy percent ≈ 18.37)
    /// - cpu0: Δuser=100, Δidle=100 (busy percent = 50); cpu1-3 unchanged
    /// - eth0: Δrx=500000 bytes, Δtx=250000 bytes; lo unchanged
    /// - sda: Δread=2000 sectors, Δwritten=1000 sectors; sda1/dm-0
    ///   advance too but stay excluded from the physical aggregate
    /// - memory: free drops to 1900000 kB
    pub fn typical_system_after_tick() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file(
            "/proc/stat",
            "\
cpu  10100 500 3060 80800 1020 200 100 0 0 0
cpu0 2600 125 750 20100 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1001000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 501000
btime 1700000000
processes 10010
procs_running 1
procs_blocked 0
",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        8000000 kB
MemFree:         1900000 kB
MemAvailable:    3900000 kB
Buffers:          512000 kB
Cached:          1024000 kB
SwapCached:            0 kB
Active:          3100000 kB
Inactive:        1500000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              2048 kB
",
        );

        fs.add_file(
            "/proc/net/dev",
            "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:   50000      500    0    0    0     0          0         0    50000      500    0    0    0     0       0          0
  eth0: 1500000    15000    0    0    0     0          0         0   850000     8500    0    0    0     0       0          0
",
        );

        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 12395 100 1002000 5040 6809 50 501000 3020 0 4010 8020 0 0 0 0
   8       1 sda1 10040 80 801600 4030 5016 40 400800 2516 0 3508 6516 0 0 0 0
 253       0 dm-0 8800 0 601200 11330 7210 0 300600 7830 0 15660 79380 0 0 0 0
",
        );

        fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::procfs::SystemReader;

    #[test]
    fn scenarios_parse_cleanly() {
        let t0 = SystemReader::new(MockFs::typical_system());
        let t1 = SystemReader::new(MockFs::typical_system_after_tick());

        assert_eq!(t0.read_cpu().unwrap().core_count(), 4);
        assert_eq!(t1.read_cpu().unwrap().core_count(), 4);
        assert!(t0.read_meminfo().unwrap().free_kb > t1.read_meminfo().unwrap().free_kb);
        assert!(t0.read_fstab().unwrap().len() == 2);
    }

    #[test]
    fn after_tick_advances_every_counter_family() {
        let t0 = SystemReader::new(MockFs::typical_system());
        let t1 = SystemReader::new(MockFs::typical_system_after_tick());

        let (c0, c1) = (t0.read_cpu().unwrap(), t1.read_cpu().unwrap());
        assert_eq!(
            c1.get("cpu").unwrap().total() - c0.get("cpu").unwrap().total(),
            980
        );

        let (n0, n1) = (t0.read_net_dev().unwrap(), t1.read_net_dev().unwrap());
        assert_eq!(
            n1.totals(None).rec_bytes - n0.totals(None).rec_bytes,
            500_000
        );
        assert_eq!(
            n1.totals(None).tra_bytes - n0.totals(None).tra_bytes,
            250_000
        );

        let (d0, d1) = (t0.read_diskstats().unwrap(), t1.read_diskstats().unwrap());
        assert_eq!(d1.read_bytes(None) - d0.read_bytes(None), 2000 * 512);
        assert_eq!(d1.write_bytes(None) - d0.write_bytes(None), 1000 * 512);
    }
}
