// Gateway trait for the presence server
use crate::domain::person::UserProfile;
use crate::domain::snapshot::Snapshot;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Events pushed over the live connection.
#[derive(Debug)]
pub enum ServerEvent {
    /// Connection established; identity may now be announced.
    Connected,
    /// Connection ended. No automatic reconnect at this layer.
    Disconnected,
    SnapshotUpdated(Snapshot),
    UserJoined { name: String },
    UserLeft { name: String },
}

#[async_trait]
pub trait ServerGateway: Send + Sync {
    /// Open the persistent push channel. Yields `Connected` once the channel
    /// is up, then server events until it drops, then `Disconnected`.
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<ServerEvent>>;

    /// Pull the current snapshot (used at startup and on focus regain).
    async fn fetch_snapshot(&self) -> anyhow::Result<Snapshot>;

    /// Pull one user's profile by id.
    async fn fetch_user(&self, user_id: u64) -> anyhow::Result<UserProfile>;

    /// Announce the signed-in user on a fresh connection.
    async fn register(&self, user_id: u64) -> anyhow::Result<()>;

    /// Forward a device position fix upstream.
    async fn send_location(&self, user_id: u64, latitude: f64, longitude: f64)
        -> anyhow::Result<()>;

    /// Best-effort departure notice on teardown.
    async fn mark_inactive(&self, user_id: u64) -> anyhow::Result<()>;
}
