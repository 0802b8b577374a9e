//! Plain text result rows
//!
//! One line per row, values comma-separated, integer nanoseconds. Nothing else
//! is ever written to the result stream.

use crate::stats::aggregator::LatencyReport;
use crate::util::time::{format_nanos, format_rate};
use crate::worker::WorkerReport;
use std::io::{self, Write};

/// Format one result row
pub fn format_row(row: &[u64]) -> String {
    row.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Write every row of the report, one per line
pub fn write_report<W: Write>(out: &mut W, report: &LatencyReport) -> io::Result<()> {
    for row in report.rows() {
        writeln!(out, "{}", format_row(row))?;
    }
    out.flush()
}

/// Log per-worker throughput at debug level
pub fn log_worker_reports(reports: &[WorkerReport]) {
    for report in reports {
        tracing::debug!(
            worker = report.worker_id,
            state = ?report.state,
            ops = report.iterations,
            measured = %format_nanos(report.elapsed_ns),
            rate = %format_rate(report.rate()),
            "worker summary"
        );
    }
}
