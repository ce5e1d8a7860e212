// ── Counter table reader ──
//
// Parses the `/proc/net/dev` layout: two header lines, then one line per
// interface of the form
//
//   iface: rx_bytes rx_packets ... (8 rx fields) tx_bytes tx_packets ...
//
// Byte counters are cumulative since interface init and may reset when
// an interface bounces; absorbing that is the rate calculator's job, not
// this module's. A malformed matching line aborts the whole read -- a
// partial snapshot would silently undercount.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::InterfaceFilter;
use crate::error::CoreError;

/// Lines of preamble before the first interface row.
const HEADER_LINES: usize = 2;

/// Minimum fields after the colon. The documented layout has 16
/// (8 receive + 8 transmit).
const MIN_FIELDS: usize = 16;

/// 0-based positions of the byte counters after the colon.
const RX_BYTES_FIELD: usize = 0;
const TX_BYTES_FIELD: usize = 8;

/// Aggregated cumulative byte counters across selected interfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Reads and aggregates the counter table.
///
/// Stateless between calls: every `read()` opens the table and captures
/// fresh totals, so it is idempotent and safe to call from anywhere.
#[derive(Debug, Clone)]
pub struct CounterSource {
    path: PathBuf,
    filter: InterfaceFilter,
}

impl CounterSource {
    pub fn new(path: impl Into<PathBuf>, filter: InterfaceFilter) -> Self {
        Self {
            path: path.into(),
            filter,
        }
    }

    /// The table path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table and sum rx/tx byte counters over matching interfaces.
    pub fn read(&self) -> Result<CounterSnapshot, CoreError> {
        let file = File::open(&self.path).map_err(|source| CoreError::SourceUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let mut totals = CounterSnapshot::default();

        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CoreError::SourceUnavailable {
                path: self.path.clone(),
                source,
            })?;

            if line_num < HEADER_LINES {
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Rows without a colon are not interface records.
            let Some((name, fields)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if !self.filter.matches(name) {
                continue;
            }

            let (rx, tx) = parse_counters(name, fields)?;
            totals.rx_bytes += rx;
            totals.tx_bytes += tx;
        }

        Ok(totals)
    }
}

/// Extract the rx/tx byte counters from one interface row's field list.
fn parse_counters(name: &str, fields: &str) -> Result<(u64, u64), CoreError> {
    let fields: Vec<&str> = fields.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(CoreError::MalformedRecord {
            interface: name.to_owned(),
            reason: format!("expected at least {MIN_FIELDS} fields, got {}", fields.len()),
        });
    }

    let rx = parse_field(name, fields[RX_BYTES_FIELD], "rx_bytes")?;
    let tx = parse_field(name, fields[TX_BYTES_FIELD], "tx_bytes")?;
    Ok((rx, tx))
}

fn parse_field(name: &str, raw: &str, which: &str) -> Result<u64, CoreError> {
    raw.parse::<u64>().map_err(|_| CoreError::MalformedRecord {
        interface: name.to_owned(),
        reason: format!("{which} field {raw:?} is not a non-negative integer"),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    const HEADER: &str = "Inter-|   Receive                                                |  Transmit\n face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n";

    fn iface_line(name: &str, rx: u64, tx: u64) -> String {
        format!("{name}: {rx} 10 0 0 0 0 0 0 {tx} 5 0 0 0 0 0 0\n")
    }

    fn table(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for line in lines {
            file.write_all(line.as_bytes()).unwrap();
        }
        file
    }

    #[test]
    fn aggregates_across_non_loopback_interfaces() {
        let file = table(&[
            iface_line("lo", 999_999, 999_999),
            iface_line("eth0", 1000, 500),
            iface_line("eth1", 1000, 500),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::ExcludeLoopback);

        let snapshot = source.read().unwrap();
        assert_eq!(
            snapshot,
            CounterSnapshot {
                rx_bytes: 2000,
                tx_bytes: 1000
            }
        );
    }

    #[test]
    fn prefix_filter_ignores_other_interfaces() {
        let file = table(&[
            iface_line("enp3s0", 700, 300),
            iface_line("docker0", 5000, 5000),
            iface_line("eth0", 5000, 5000),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::Prefix("en".into()));

        let snapshot = source.read().unwrap();
        assert_eq!(
            snapshot,
            CounterSnapshot {
                rx_bytes: 700,
                tx_bytes: 300
            }
        );
    }

    #[test]
    fn short_record_fails_whole_read() {
        let file = table(&[
            iface_line("eth0", 1000, 500),
            "eth1: 12 3 4\n".to_owned(),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::ExcludeLoopback);

        let err = source.read().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedRecord { ref interface, .. } if interface == "eth1"
        ));
    }

    #[test]
    fn unparseable_counter_fails_whole_read() {
        let file = table(&[
            "eth0: x 10 0 0 0 0 0 0 500 5 0 0 0 0 0 0\n".to_owned(),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::ExcludeLoopback);

        assert!(matches!(
            source.read().unwrap_err(),
            CoreError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn short_record_on_filtered_interface_is_ignored() {
        // Only *matching* lines are validated; a broken loopback row
        // does not poison the read.
        let file = table(&[
            "lo: 12 3\n".to_owned(),
            iface_line("eth0", 1000, 500),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::ExcludeLoopback);

        let snapshot = source.read().unwrap();
        assert_eq!(snapshot.rx_bytes, 1000);
    }

    #[test]
    fn missing_table_is_source_unavailable() {
        let source = CounterSource::new("/nonexistent/net/dev", InterfaceFilter::default());
        assert!(matches!(
            source.read().unwrap_err(),
            CoreError::SourceUnavailable { .. }
        ));
    }

    #[test]
    fn empty_and_colonless_lines_are_skipped() {
        let file = table(&[
            "\n".to_owned(),
            "some stray diagnostic line\n".to_owned(),
            iface_line("eth0", 42, 7),
        ]);
        let source = CounterSource::new(file.path(), InterfaceFilter::ExcludeLoopback);

        let snapshot = source.read().unwrap();
        assert_eq!(
            snapshot,
            CounterSnapshot {
                rx_bytes: 42,
                tx_bytes: 7
            }
        );
    }
}
