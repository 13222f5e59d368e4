//! Outcome reporting

use log::{error, info, warn};

use crate::editor::CellChange;
use crate::error::ApiError;
use crate::response::ApplyResponse;

/// Receives the outcome of every write.
///
/// Called from the write task once the sink has answered.
pub trait ErrorReporter: Send + Sync {
    /// The endpoint accepted the request.
    fn applied(&self, change: &CellChange, response: &ApplyResponse);

    /// The request failed or the endpoint answered with an error status.
    fn failed(&self, change: &CellChange, error: &ApiError);
}

/// Reports outcomes to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn applied(&self, change: &CellChange, response: &ApplyResponse) {
        match &response.error {
            Some(reason) => warn!(
                "Endpoint accepted {} with status {} but reported: {}",
                change, response.status, reason
            ),
            None => info!("Applied {} (status {})", change, response.status),
        }
    }

    fn failed(&self, change: &CellChange, error: &ApiError) {
        error!("Failed to apply {}: {}", change, error);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::*;

    /// Keeps the records of changes to the `ledger` table; other tests log
    /// through the same global logger.
    struct Capture(Mutex<Vec<(Level, String)>>);

    impl Log for Capture {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let message = record.args().to_string();
            if message.contains("ledger[") {
                self.0.lock().unwrap().push((record.level(), message));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    fn change(value: &str) -> CellChange {
        CellChange {
            table_name: "ledger".into(),
            column_label: "Amount".into(),
            row_label: "2024-01".into(),
            new_value: value.into(),
        }
    }

    #[test]
    fn test_log_reporter_levels() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);

        let reporter = LogReporter;
        reporter.applied(
            &change("10"),
            &ApplyResponse::from_body(200, r#"{"message": "updated"}"#),
        );
        reporter.applied(
            &change("20"),
            &ApplyResponse::from_body(200, r#"{"error": "no such column"}"#),
        );
        reporter.failed(&change("30"), &ApiError::http(500, "database unavailable"));

        let records = CAPTURE.0.lock().unwrap();
        let levels: Vec<Level> = records.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, [Level::Info, Level::Warn, Level::Error]);
        assert!(records[0].1.contains("\"10\""));
        assert!(records[1].1.contains("no such column"));
        assert!(records[2].1.contains("database unavailable"));
    }
}
