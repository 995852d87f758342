use chrono::Utc;
use std::path::PathBuf;

/// Split a comma-separated argument, dropping blanks.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// RFC 3339 timestamp stamped onto reports.
pub fn report_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// A unique scratch directory under the system temp dir.
pub fn scratch_dir(label: &str) -> PathBuf {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!("animexword-tester-{label}-{stamp}"))
}
