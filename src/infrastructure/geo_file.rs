// File-backed position source
//
// No portable device-location API exists on a plain host, so the shipped
// adapter polls a coordinates file maintained by whatever companion agent
// the deployment has (phone bridge, gpsd exporter, test fixture).
use crate::application::position_source::{
    GeoError, PositionFix, PositionSource, WatchHandle, WatchOptions,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Deserialize)]
struct CoordinatesFile {
    latitude: f64,
    longitude: f64,
    /// The companion agent sets this when the user refused location access.
    #[serde(default)]
    denied: bool,
}

#[derive(Debug, Clone)]
pub struct FilePositionSource {
    path: PathBuf,
    poll_interval: Duration,
}

impl FilePositionSource {
    pub fn new(path: PathBuf, poll_interval: Duration) -> Self {
        Self {
            path,
            poll_interval,
        }
    }
}

enum Poll {
    Fix(PositionFix),
    Denied,
    /// File missing or stale; keep waiting.
    Pending,
    Invalid,
}

async fn poll_file(path: &PathBuf, maximum_age: Duration) -> Poll {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return Poll::Pending;
    };
    if let Ok(modified) = metadata.modified() {
        if let Ok(age) = modified.elapsed() {
            if age > maximum_age {
                return Poll::Pending;
            }
        }
    }

    let Ok(raw) = tokio::fs::read_to_string(path).await else {
        return Poll::Pending;
    };
    match serde_json::from_str::<CoordinatesFile>(&raw) {
        Ok(parsed) if parsed.denied => Poll::Denied,
        Ok(parsed) => Poll::Fix(PositionFix {
            latitude: parsed.latitude,
            longitude: parsed.longitude,
        }),
        Err(e) => {
            tracing::warn!("unreadable coordinates file {}: {e}", path.display());
            Poll::Invalid
        }
    }
}

#[async_trait]
impl PositionSource for FilePositionSource {
    async fn watch(
        &self,
        options: WatchOptions,
    ) -> Result<(mpsc::Receiver<Result<PositionFix, GeoError>>, WatchHandle), GeoError> {
        let (tx, rx) = mpsc::channel(8);
        let path = self.path.clone();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut last_fix_at = Instant::now();

            loop {
                ticker.tick().await;
                match poll_file(&path, options.maximum_age).await {
                    Poll::Fix(fix) => {
                        last_fix_at = Instant::now();
                        if tx.send(Ok(fix)).await.is_err() {
                            return;
                        }
                    }
                    Poll::Denied => {
                        let _ = tx.send(Err(GeoError::PermissionDenied)).await;
                        return;
                    }
                    Poll::Invalid => {
                        let _ = tx.send(Err(GeoError::Unavailable)).await;
                        return;
                    }
                    Poll::Pending => {
                        if last_fix_at.elapsed() >= options.timeout {
                            let _ = tx.send(Err(GeoError::Timeout)).await;
                            return;
                        }
                    }
                }
            }
        });

        Ok((rx, WatchHandle::new(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> WatchOptions {
        WatchOptions {
            timeout: Duration::from_millis(100),
            maximum_age: Duration::from_secs(120),
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("presence-board-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_reports_fix_from_file() {
        let path = scratch_path("fix");
        std::fs::write(&path, r#"{"latitude": 51.5034, "longitude": -0.1276}"#).unwrap();

        let source = FilePositionSource::new(path.clone(), Duration::from_millis(10));
        let (mut rx, _watch) = source.watch(options()).await.unwrap();

        let fix = rx.recv().await.unwrap().unwrap();
        assert!((fix.latitude - 51.5034).abs() < 1e-9);
        assert!((fix.longitude + 0.1276).abs() < 1e-9);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_denied_file_maps_to_permission_denied() {
        let path = scratch_path("denied");
        std::fs::write(
            &path,
            r#"{"latitude": 0.0, "longitude": 0.0, "denied": true}"#,
        )
        .unwrap();

        let source = FilePositionSource::new(path.clone(), Duration::from_millis(10));
        let (mut rx, _watch) = source.watch(options()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Err(GeoError::PermissionDenied));
        // The watch stops after a terminal error.
        assert!(rx.recv().await.is_none());

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_times_out() {
        let path = scratch_path("absent");
        std::fs::remove_file(&path).ok();

        let source = FilePositionSource::new(path, Duration::from_millis(10));
        let (mut rx, _watch) = source.watch(options()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Err(GeoError::Timeout));
    }
}
