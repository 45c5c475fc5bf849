//! Property tests for diagnostic output parsing

use hostpulse_core::monitoring::{MetricsParser, SEPARATOR, UPTIME_PLACEHOLDER};
use proptest::prelude::*;

proptest! {
    /// Property: procps summaries report 100 minus idle
    #[test]
    fn cpu_is_complement_of_idle(
        idle_tenths in 0u32..=1000,
        user_tenths in 0u32..=1000,
    ) {
        let idle = f64::from(idle_tenths) / 10.0;
        let line = format!(
            "%Cpu(s): {:.1} us,  0.3 sy,  0.0 ni, {idle:.1} id,  0.0 wa",
            f64::from(user_tenths) / 10.0
        );
        let cpu = MetricsParser::parse_cpu(&line);
        prop_assert!((cpu - (100.0 - idle)).abs() < 0.051, "cpu {} idle {}", cpu, idle);
    }

    /// Property: busybox summaries report 100 minus idle
    #[test]
    fn busybox_cpu_is_complement_of_idle(idle in 0u32..=100) {
        let line = format!("CPU:   1% usr   1% sys   0% nic  {idle}% idle   0% io   0% irq");
        let cpu = MetricsParser::parse_cpu(&line);
        prop_assert!((cpu - f64::from(100 - idle)).abs() < f64::EPSILON);
    }

    /// Property: CPU usage always lies within 0–100
    #[test]
    fn cpu_always_in_range(input in ".{0,200}") {
        let cpu = MetricsParser::parse_cpu(&input);
        prop_assert!((0.0..=100.0).contains(&cpu));
    }

    /// Property: `free -m` rows round-trip used and total
    #[test]
    fn memory_fields_extracted(total in 1u64..10_000_000, used in 0u64..10_000_000) {
        let output = format!(
            "               total        used        free\nMem:   {total}   {used}   0\nSwap:  0 0 0\n"
        );
        let mem = MetricsParser::parse_memory(&output);
        prop_assert_eq!(mem.total_mb, total);
        prop_assert_eq!(mem.used_mb, used);
    }

    /// Property: the root filesystem row is found regardless of device name
    #[test]
    fn disk_root_row_extracted(
        device in "/dev/[a-z]{2,6}[0-9]",
        percent in 0u8..=100,
    ) {
        let output = format!(
            "Filesystem      Size  Used Avail Use% Mounted on\n{device}  100G  40G  60G  {percent}% /\n"
        );
        let disk = MetricsParser::parse_disk(&output);
        prop_assert_eq!(disk.total, "100G");
        prop_assert_eq!(disk.used, "40G");
        prop_assert_eq!(disk.percent, percent);
    }

    /// Property: loopback traffic is never counted
    #[test]
    fn net_dev_excludes_loopback(
        lo in 0u64..1_000_000_000,
        rx in proptest::collection::vec(0u64..1_000_000_000, 1..4),
    ) {
        let mut output = String::from("Inter-|   Receive |  Transmit\n face |bytes packets|bytes packets\n");
        output.push_str(&format!("    lo: {lo} 1 0 0 0 0 0 0 {lo} 1 0 0 0 0 0 0\n"));
        for (i, bytes) in rx.iter().enumerate() {
            output.push_str(&format!("  eth{i}: {bytes} 1 0 0 0 0 0 0 {bytes} 1 0 0 0 0 0 0\n"));
        }
        let net = MetricsParser::parse_net_dev(&output);
        prop_assert_eq!(net.rx_bytes, rx.iter().sum::<u64>());
        prop_assert_eq!(net.tx_bytes, rx.iter().sum::<u64>());
    }

    /// Property: parsing never panics and missing sections fall back to zero
    #[test]
    fn parse_is_total(sections in proptest::collection::vec(".{0,80}", 0..7)) {
        let output = sections.join(SEPARATOR);
        let parsed = MetricsParser::parse(&output);
        prop_assert!((0.0..=100.0).contains(&parsed.cpu_percent));
        prop_assert!(parsed.disk.percent <= 100);
        prop_assert!(!parsed.uptime.is_empty());
    }
}

#[test]
fn empty_output_yields_placeholders() {
    let parsed = MetricsParser::parse("");
    assert!(parsed.cpu_percent.abs() < f64::EPSILON);
    assert_eq!(parsed.memory.total_mb, 0);
    assert_eq!(parsed.disk.total, "0");
    assert_eq!(parsed.uptime, UPTIME_PLACEHOLDER);
}
