//! Write dispatch and result channel.

use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use super::{ChangeSink, ErrorReporter, LogReporter};
use crate::editor::CellChange;
use crate::error::{ApiError, GridError};
use crate::response::ApplyResponse;

/// Sends committed changes to a sink without blocking the caller.
///
/// Every dispatch spawns one task. Tasks are independent: they are neither
/// ordered nor cancelled, and a failed write is reported, never retried.
/// Cheap to clone.
#[derive(Clone)]
pub struct ChangeDispatcher {
    sink: Arc<dyn ChangeSink>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ChangeDispatcher {
    /// Create a dispatcher that reports to the log.
    pub fn new(sink: impl ChangeSink + 'static) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    /// Create a dispatcher around a shared sink.
    pub fn from_arc(sink: Arc<dyn ChangeSink>) -> Self {
        Self {
            sink,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Replace the outcome reporter.
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Start writing `change` on the current Tokio runtime.
    ///
    /// Returns immediately. The returned [`PendingWrite`] can be awaited for
    /// the result or dropped; the write runs to completion either way.
    pub fn dispatch(&self, change: CellChange) -> Result<PendingWrite, GridError> {
        let handle = Handle::try_current().map_err(|_| GridError::NoRuntime)?;
        let (tx, rx) = oneshot::channel();

        let sink = self.sink.clone();
        let reporter = self.reporter.clone();
        let task_change = change.clone();
        debug!("Dispatching {}", change);

        handle.spawn(async move {
            let result = sink.apply(&task_change).await;
            match &result {
                Ok(response) => reporter.applied(&task_change, response),
                Err(error) => reporter.failed(&task_change, error),
            }
            // The receiver may be gone; the outcome was reported already.
            let _ = tx.send(result);
        });

        Ok(PendingWrite { change, rx })
    }
}

impl std::fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDispatcher").finish_non_exhaustive()
    }
}

/// A write in flight.
#[derive(Debug)]
pub struct PendingWrite {
    change: CellChange,
    rx: oneshot::Receiver<Result<ApplyResponse, ApiError>>,
}

impl PendingWrite {
    /// Returns the change being written.
    pub fn change(&self) -> &CellChange {
        &self.change
    }

    /// Wait for the write to finish.
    pub async fn wait(self) -> Result<ApplyResponse, ApiError> {
        self.rx.await.map_err(|_| ApiError::Dropped)?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        changes: Mutex<Vec<CellChange>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl ChangeSink for RecordingSink {
        async fn apply(&self, change: &CellChange) -> Result<ApplyResponse, ApiError> {
            self.changes.lock().unwrap().push(change.clone());
            match self.fail_with {
                Some(status) => Err(ApiError::http(status, "boom")),
                None => Ok(ApplyResponse::from_body(200, r#"{"message":"ok"}"#)),
            }
        }
    }

    #[derive(Default)]
    struct CountingReporter {
        applied: Mutex<usize>,
        failed: Mutex<Vec<Option<u16>>>,
    }

    impl ErrorReporter for Arc<CountingReporter> {
        fn applied(&self, _change: &CellChange, _response: &ApplyResponse) {
            *self.applied.lock().unwrap() += 1;
        }

        fn failed(&self, _change: &CellChange, error: &ApiError) {
            self.failed.lock().unwrap().push(error.status_code());
        }
    }

    fn change() -> CellChange {
        CellChange {
            table_name: "employees".into(),
            column_label: "Salary".into(),
            row_label: "Alice".into(),
            new_value: "1200".into(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_reports_success() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = Arc::new(CountingReporter::default());
        let dispatcher = ChangeDispatcher::from_arc(sink.clone()).with_reporter(reporter.clone());

        let pending = dispatcher.dispatch(change()).unwrap();
        assert_eq!(pending.change(), &change());

        let response = pending.wait().await.unwrap();
        assert_eq!(response.message.as_deref(), Some("ok"));
        assert_eq!(*sink.changes.lock().unwrap(), vec![change()]);
        assert_eq!(*reporter.applied.lock().unwrap(), 1);
        assert!(reporter.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_reports_failure() {
        let sink = RecordingSink {
            fail_with: Some(500),
            ..Default::default()
        };
        let reporter = Arc::new(CountingReporter::default());
        let dispatcher = ChangeDispatcher::new(sink).with_reporter(reporter.clone());

        let error = dispatcher.dispatch(change()).unwrap().wait().await.unwrap_err();
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(*reporter.failed.lock().unwrap(), vec![Some(500)]);
        assert_eq!(*reporter.applied.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_pending_write_still_runs() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = Arc::new(CountingReporter::default());
        let dispatcher = ChangeDispatcher::from_arc(sink.clone()).with_reporter(reporter.clone());

        drop(dispatcher.dispatch(change()).unwrap());
        // A second write we do wait on; by then the first task has run on
        // this single-threaded runtime.
        dispatcher.dispatch(change()).unwrap().wait().await.unwrap();

        assert_eq!(sink.changes.lock().unwrap().len(), 2);
        assert_eq!(*reporter.applied.lock().unwrap(), 2);
    }

    #[test]
    fn test_dispatch_without_runtime() {
        let dispatcher = ChangeDispatcher::new(RecordingSink::default());
        assert_eq!(
            dispatcher.dispatch(change()).unwrap_err(),
            GridError::NoRuntime
        );
    }
}
