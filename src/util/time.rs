//! Human-readable formatting for diagnostics
//!
//! Result rows are always raw integer nanoseconds; these helpers only feed the
//! log lines emitted on stderr.

/// Format a nanosecond count in human-readable form
///
/// # Examples
///
/// ```
/// use fsbench::util::time::format_nanos;
///
/// assert_eq!(format_nanos(500), "500ns");
/// assert_eq!(format_nanos(1_500), "1.50us");
/// assert_eq!(format_nanos(2_500_000), "2.50ms");
/// assert_eq!(format_nanos(5_000_000_000), "5.00s");
/// ```
pub fn format_nanos(nanos: u64) -> String {
    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a rate (operations per second)
///
/// # Examples
///
/// ```
/// use fsbench::util::time::format_rate;
///
/// assert_eq!(format_rate(500.0), "500");
/// assert_eq!(format_rate(1500.0), "1.50K");
/// assert_eq!(format_rate(2_500_000.0), "2.50M");
/// ```
pub fn format_rate(rate: f64) -> String {
    if rate < 1_000.0 {
        format!("{:.0}", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.2}K", rate / 1_000.0)
    } else if rate < 1_000_000_000.0 {
        format!("{:.2}M", rate / 1_000_000.0)
    } else {
        format!("{:.2}G", rate / 1_000_000_000.0)
    }
}

/// Operations per second over an accumulated nanosecond total
pub fn calculate_rate(operations: u64, elapsed_ns: u64) -> f64 {
    if elapsed_ns > 0 {
        operations as f64 / (elapsed_ns as f64 / 1_000_000_000.0)
    } else {
        0.0
    }
}
