//! Parsers for remote diagnostic command output
//!
//! Output format varies by distribution and by which tools are installed
//! (procps `top` vs busybox `top`, `uptime -p` vs plain `uptime`), so every
//! parser tries a list of strategies and falls back to a zero value instead
//! of failing. A host can therefore show as connected with zero metrics.

use std::sync::LazyLock;

use regex::Regex;

use super::metrics::UPTIME_PLACEHOLDER;

/// Marker echoed between the sections of [`MONITOR_COMMAND`]
pub const SEPARATOR: &str = "---SEPARATOR---";

/// Shell command that collects all metrics in one round trip.
///
/// Sections, in order: CPU, memory, disk, network, uptime.
pub const MONITOR_COMMAND: &str = concat!(
    "top -bn1 | grep \"Cpu\" || top -bn1 | head -5",
    " && echo \"---SEPARATOR---\" && ",
    "free -m",
    " && echo \"---SEPARATOR---\" && ",
    "df -h /",
    " && echo \"---SEPARATOR---\" && ",
    "cat /proc/net/dev",
    " && echo \"---SEPARATOR---\" && ",
    "uptime -p 2>/dev/null || uptime",
);

static CPU_SUMMARY_IDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Cpu\(s\).*?(\d+\.?\d*)\s*(?:id|idle)").expect("valid regex"));
static BUSYBOX_IDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CPU:.*?(\d+)%\s*idle").expect("valid regex"));
static USER_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*(?:%\s*)?us").expect("valid regex"));
static SYSTEM_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*(?:%\s*)?sy").expect("valid regex"));
static MEM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Mem:\s+(\d+)\s+(\d+)").expect("valid regex"));
static NET_DEV_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+):\s*(\d+)\s+\d+\s+\d+\s+\d+\s+\d+\s+\d+\s+\d+\s+\d+\s+(\d+)")
        .expect("valid regex")
});
static UPTIME_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)up\s+(.+)").expect("valid regex"));
static USERS_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\d+\s*users?,?\s*$").expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*$").expect("valid regex"));

/// Memory figures from `free -m`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Used memory (MB)
    pub used_mb: u64,
    /// Total memory (MB)
    pub total_mb: u64,
}

/// Root filesystem usage from `df -h /`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    /// Used space, as printed
    pub used: String,
    /// Filesystem size, as printed
    pub total: String,
    /// Use percentage (0–100)
    pub percent: u8,
}

impl Default for DiskUsage {
    fn default() -> Self {
        Self {
            used: "0".to_string(),
            total: "0".to_string(),
            percent: 0,
        }
    }
}

/// Summed interface counters from `/proc/net/dev`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    /// Received bytes
    pub rx_bytes: u64,
    /// Transmitted bytes
    pub tx_bytes: u64,
}

/// Everything parsed from one [`MONITOR_COMMAND`] run, before rate derivation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMetrics {
    /// CPU usage percentage
    pub cpu_percent: f64,
    /// Memory usage
    pub memory: MemoryUsage,
    /// Root filesystem usage
    pub disk: DiskUsage,
    /// Network counters
    pub network: NetCounters,
    /// Uptime text
    pub uptime: String,
}

/// Stateless parser for diagnostic output
pub struct MetricsParser;

impl MetricsParser {
    /// Splits the combined output on [`SEPARATOR`] and parses each section.
    ///
    /// Missing sections parse as empty text.
    #[must_use]
    pub fn parse(output: &str) -> ParsedMetrics {
        let sections: Vec<&str> = output.split(SEPARATOR).collect();
        let section = |i: usize| sections.get(i).copied().unwrap_or("");

        ParsedMetrics {
            cpu_percent: Self::parse_cpu(section(0)),
            memory: Self::parse_memory(section(1)),
            disk: Self::parse_disk(section(2)),
            network: Self::parse_net_dev(section(3)),
            uptime: Self::parse_uptime(section(4)),
        }
    }

    /// Total CPU usage from `top` output.
    ///
    /// procps: `%Cpu(s):  2.3 us,  0.7 sy,  0.0 ni, 96.7 id, ...`
    /// busybox: `CPU:   2% usr   0% sys   0% nic  97% idle ...`
    #[must_use]
    pub fn parse_cpu(output: &str) -> f64 {
        if let Some(idle) = capture_f64(&CPU_SUMMARY_IDLE, output) {
            return clamp_percent(round_one_decimal(100.0 - idle));
        }

        if let Some(idle) = BUSYBOX_IDLE
            .captures(output)
            .and_then(|c| c[1].parse::<u32>().ok())
        {
            return clamp_percent(100.0 - f64::from(idle));
        }

        if let (Some(user), Some(system)) = (
            capture_f64(&USER_TIME, output),
            capture_f64(&SYSTEM_TIME, output),
        ) {
            return clamp_percent(round_one_decimal(user + system));
        }

        0.0
    }

    /// Used and total memory from `free -m`.
    ///
    /// Format: `Mem:  <total>  <used>  <free> ...`
    #[must_use]
    pub fn parse_memory(output: &str) -> MemoryUsage {
        MEM_LINE
            .captures(output)
            .and_then(|c| {
                let total_mb = c[1].parse().ok()?;
                let used_mb = c[2].parse().ok()?;
                Some(MemoryUsage { used_mb, total_mb })
            })
            .unwrap_or_default()
    }

    /// Root filesystem usage from `df -h /`.
    ///
    /// Picks the row mounted on `/`; if none matches, the first data row with
    /// enough columns is used whatever its mount point. Busybox wraps a long
    /// device name onto its own line, leaving the figures on a row without
    /// the filesystem column, so columns are counted from the mount point.
    #[must_use]
    pub fn parse_disk(output: &str) -> DiskUsage {
        let rows: Vec<Vec<&str>> = output
            .trim()
            .lines()
            .skip(1)
            .map(|line| line.split_whitespace().collect())
            .filter(|parts: &Vec<&str>| parts.len() >= 5)
            .collect();

        rows.iter()
            .find(|parts| parts.last() == Some(&"/"))
            .or_else(|| rows.first())
            .map(|parts| Self::disk_row(parts))
            .unwrap_or_default()
    }

    /// `[Filesystem] Size Used Avail Use% Mounted`, indexed from the end
    fn disk_row(parts: &[&str]) -> DiskUsage {
        let col = |from_end: usize| parts[parts.len() - from_end];
        let percent = col(2)
            .replace('%', "")
            .parse::<u32>()
            .map(|p| p.min(100) as u8)
            .unwrap_or(0);
        DiskUsage {
            used: col(4).to_string(),
            total: col(5).to_string(),
            percent,
        }
    }

    /// Sums receive and transmit bytes over every interface except `lo`
    #[must_use]
    pub fn parse_net_dev(output: &str) -> NetCounters {
        output
            .trim()
            .lines()
            .filter_map(|line| NET_DEV_LINE.captures(line))
            .filter(|c| &c[1] != "lo")
            .fold(NetCounters::default(), |acc, c| NetCounters {
                rx_bytes: acc
                    .rx_bytes
                    .saturating_add(c[2].parse().unwrap_or(0)),
                tx_bytes: acc
                    .tx_bytes
                    .saturating_add(c[3].parse().unwrap_or(0)),
            })
    }

    /// Uptime text from `uptime -p` or `uptime`.
    ///
    /// `up 5 days, 3 hours, 42 minutes` becomes `5 days, 3 hours, 42 minutes`;
    /// ` 10:42:01 up 5 days,  3:42,  2 users,  load average: ...` becomes
    /// `5 days,  3:42`.
    #[must_use]
    pub fn parse_uptime(output: &str) -> String {
        let Some(caps) = UPTIME_TAIL.captures(output) else {
            return UPTIME_PLACEHOLDER.to_string();
        };

        let mut result = caps[1].trim().to_string();
        if let Some(idx) = result.find("load average") {
            result = USERS_CLAUSE
                .replace(&result[..idx], "")
                .trim()
                .to_string();
        }
        let result = TRAILING_COMMA.replace(&result, "");

        if result.is_empty() {
            UPTIME_PLACEHOLDER.to_string()
        } else {
            result.into_owned()
        }
    }
}

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text).and_then(|c| c[1].parse().ok())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
