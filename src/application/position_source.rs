// Device position port and its failure taxonomy
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a watch produced no usable fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    Unavailable,
    #[error("Location timeout")]
    Timeout,
}

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Give up on a pending fix after this long.
    pub timeout: Duration,
    /// Hint to the source: fixes older than this are stale. Mirrors the
    /// outbound rate limit; the source may still report more often.
    pub maximum_age: Duration,
}

/// Cancel handle for a standing watch. Aborts the producer task on drop so
/// device access never outlives the session that asked for it.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Start watching device position. Returns an error only when watching
    /// cannot start at all (e.g. no device support); per-fix failures arrive
    /// through the receiver.
    async fn watch(
        &self,
        options: WatchOptions,
    ) -> Result<(mpsc::Receiver<Result<PositionFix, GeoError>>, WatchHandle), GeoError>;
}
