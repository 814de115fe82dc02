//! Prometheus textfile output.
//!
//! The controller exits after one invocation, so metrics are written to a
//! file for a node-exporter textfile collector instead of being served.

use crate::metrics::MetricsCollector;
use prometheus_client::encoding::text::encode;
use std::io;
use std::path::Path;
use tracing::debug;

/// Encode `collector` in the Prometheus text format and write it to `path`.
///
/// The file is written next to `path` first and then renamed, so a
/// concurrent scrape never sees a partial file.
pub fn write_textfile(collector: &MetricsCollector, path: &Path) -> io::Result<()> {
    let mut buffer = String::new();
    encode(&mut buffer, collector.registry())
        .map_err(|e| io::Error::other(format!("failed to encode metrics: {}", e)))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    std::fs::write(&tmp, buffer.as_bytes())?;
    std::fs::rename(&tmp, path)?;

    debug!(path = %path.display(), bytes = buffer.len(), "metrics textfile written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InvocationResult;
    use std::time::Duration;

    #[test]
    fn test_write_textfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lbfailover.prom");

        let collector = MetricsCollector::new();
        collector.record_invocation(InvocationResult::NoAction, Duration::from_millis(15));

        write_textfile(&collector, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("lbfailover_invocations_total"));
        assert!(!dir.path().join("lbfailover.prom.tmp").exists());
    }

    #[test]
    fn test_write_textfile_missing_dir() {
        let collector = MetricsCollector::new();
        let result = write_textfile(&collector, Path::new("/nonexistent/dir/lbfailover.prom"));
        assert!(result.is_err());
    }
}
