//! ChangeSink trait

use async_trait::async_trait;

use crate::editor::CellChange;
use crate::error::ApiError;
use crate::response::ApplyResponse;

/// Something that durably applies a committed cell change.
///
/// [`ApplyClient`](crate::ApplyClient) posts to the HTTP endpoint; tests and
/// alternative front-ends can supply their own.
#[async_trait]
pub trait ChangeSink: Send + Sync {
    /// Apply one change. Implementations do not retry.
    async fn apply(&self, change: &CellChange) -> Result<ApplyResponse, ApiError>;
}
