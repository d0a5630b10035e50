// Live session - Explicit state machine over the server and device events
use crate::application::board_service::{join_alerts, zone_summaries};
use crate::application::layout_service::{build_figures, PhaseSource};
use crate::application::position_source::{
    GeoError, PositionFix, PositionSource, WatchHandle, WatchOptions,
};
use crate::application::server_gateway::{ServerEvent, ServerGateway};
use crate::application::view::{BoardView, StatusLine};
use crate::domain::figure::Figure;
use crate::domain::snapshot::Snapshot;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Everything the session reacts to, from every producer, in one stream.
#[derive(Debug)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    SnapshotUpdated(Snapshot),
    UserJoined { name: String },
    UserLeft { name: String },
    Fix(PositionFix),
    FixFailed(GeoError),
    /// Terminal regained focus; re-pull the snapshot once.
    FocusRegained,
    Shutdown,
}

impl From<ServerEvent> for SessionEvent {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Connected => SessionEvent::Connected,
            ServerEvent::Disconnected => SessionEvent::Disconnected,
            ServerEvent::SnapshotUpdated(snapshot) => SessionEvent::SnapshotUpdated(snapshot),
            ServerEvent::UserJoined { name } => SessionEvent::UserJoined { name },
            ServerEvent::UserLeft { name } => SessionEvent::UserLeft { name },
        }
    }
}

/// Geolocation display status: Idle → Requesting → Active on success,
/// Requesting|Active → Error on failure. Error is terminal, no retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingState {
    Idle,
    Requesting,
    Active { latitude: f64, longitude: f64 },
    Error(GeoError),
}

/// Outbound rate limit on position updates. Millisecond-based so the
/// decision logic needs no clock of its own. The device may report far more
/// often than the minimum interval; extra fixes are dropped silently.
#[derive(Debug)]
pub struct UpdateLimiter {
    min_interval_ms: u64,
    last_sent_ms: Option<u64>,
}

impl UpdateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval_ms: min_interval.as_millis() as u64,
            last_sent_ms: None,
        }
    }

    /// True when a fix observed at `now_ms` should be transmitted: the first
    /// fix always, later ones only after the minimum interval.
    pub fn should_send(&mut self, now_ms: u64) -> bool {
        let send = match self.last_sent_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.min_interval_ms,
        };
        if send {
            self.last_sent_ms = Some(now_ms);
        }
        send
    }
}

pub struct Session {
    gateway: Arc<dyn ServerGateway>,
    source: Arc<dyn PositionSource>,
    view: Arc<dyn BoardView>,
    phases: Box<dyn PhaseSource + Send>,
    user_id: Option<u64>,
    tracking: TrackingState,
    limiter: UpdateLimiter,
    watch_options: WatchOptions,
    watch: Option<WatchHandle>,
    figures_tx: watch::Sender<Arc<Vec<Figure>>>,
    events_tx: mpsc::Sender<SessionEvent>,
    started: Instant,
}

impl Session {
    pub fn new(
        gateway: Arc<dyn ServerGateway>,
        source: Arc<dyn PositionSource>,
        view: Arc<dyn BoardView>,
        phases: Box<dyn PhaseSource + Send>,
        user_id: Option<u64>,
        min_send_interval: Duration,
        watch_options: WatchOptions,
        events_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            gateway,
            source,
            view,
            phases,
            user_id,
            tracking: TrackingState::Idle,
            limiter: UpdateLimiter::new(min_send_interval),
            watch_options,
            watch: None,
            figures_tx: watch::channel(Arc::new(Vec::new())).0,
            events_tx,
            started: Instant::now(),
        }
    }

    /// Receiver for the render loop. The figure set behind it is only ever
    /// replaced wholesale.
    pub fn figures(&self) -> watch::Receiver<Arc<Vec<Figure>>> {
        self.figures_tx.subscribe()
    }

    pub fn tracking(&self) -> TrackingState {
        self.tracking
    }

    /// Drive the session until the event stream ends or `Shutdown` arrives.
    /// Pulls the current snapshot once up front; everything after that is
    /// event-driven.
    pub async fn run(mut self, mut events: impl Stream<Item = SessionEvent> + Unpin) {
        self.refetch_snapshot().await;

        while let Some(event) = events.next().await {
            if matches!(event, SessionEvent::Shutdown) {
                self.teardown().await;
                return;
            }
            self.handle(event).await;
        }
        self.teardown().await;
    }

    pub async fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => self.on_connected().await,
            SessionEvent::Disconnected => {
                tracing::info!("disconnected from presence server");
            }
            SessionEvent::SnapshotUpdated(snapshot) => self.apply_snapshot(&snapshot),
            SessionEvent::UserJoined { name } => {
                self.view.push_notice(format!("{name} just checked in!"));
            }
            SessionEvent::UserLeft { name } => {
                self.view.push_notice(format!("{name} left"));
            }
            SessionEvent::Fix(fix) => self.on_fix(fix).await,
            SessionEvent::FixFailed(error) => self.on_fix_failed(error),
            SessionEvent::FocusRegained => self.refetch_snapshot().await,
            // Consumed by run before dispatch.
            SessionEvent::Shutdown => {}
        }
    }

    async fn on_connected(&mut self) {
        tracing::info!("connected to presence server");
        let Some(user_id) = self.user_id else {
            return;
        };

        if let Err(e) = self.gateway.register(user_id).await {
            tracing::warn!("failed to register user {user_id}: {e:#}");
        }

        match self.gateway.fetch_user(user_id).await {
            Ok(profile) => self
                .view
                .set_user(&profile.name, profile.current_zone.as_deref()),
            Err(e) => tracing::warn!("failed to fetch user {user_id}: {e:#}"),
        }

        self.start_tracking().await;
    }

    async fn start_tracking(&mut self) {
        self.tracking = TrackingState::Requesting;
        self.view
            .set_status(StatusLine::Inactive("Requesting location...".to_string()));

        match self.source.watch(self.watch_options).await {
            Ok((mut rx, handle)) => {
                self.watch = Some(handle);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    while let Some(result) = rx.recv().await {
                        let event = match result {
                            Ok(fix) => SessionEvent::Fix(fix),
                            Err(e) => SessionEvent::FixFailed(e),
                        };
                        if events_tx.send(event).await.is_err() {
                            return;
                        }
                    }
                });
            }
            Err(e) => self.on_fix_failed(e),
        }
    }

    async fn on_fix(&mut self, fix: PositionFix) {
        let now_ms = self.started.elapsed().as_millis() as u64;
        if !self.limiter.should_send(now_ms) {
            return;
        }

        if let Some(user_id) = self.user_id {
            if let Err(e) = self
                .gateway
                .send_location(user_id, fix.latitude, fix.longitude)
                .await
            {
                tracing::warn!("failed to send location update: {e:#}");
            }
        }

        self.tracking = TrackingState::Active {
            latitude: fix.latitude,
            longitude: fix.longitude,
        };
        self.view.set_status(StatusLine::Active(format!(
            "{:.4}, {:.4}",
            fix.latitude, fix.longitude
        )));
    }

    fn on_fix_failed(&mut self, error: GeoError) {
        tracing::warn!("geolocation error: {error}");
        self.tracking = TrackingState::Error(error);
        self.view.set_status(StatusLine::Inactive(error.to_string()));
        // Error is terminal; stop the watch rather than surface stale fixes.
        if let Some(watch) = self.watch.take() {
            watch.cancel();
        }
    }

    fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        let figures = build_figures(snapshot, self.phases.as_mut());
        self.figures_tx.send_replace(Arc::new(figures));

        self.view.set_summary(&zone_summaries(snapshot));
        // Whole-set replacement: a qualifying cluster shows one standing
        // alert, and a snapshot with none clears the panel.
        self.view.set_alerts(&join_alerts(snapshot));
    }

    /// One-shot pull to cover pushes missed while unfocused. Not a poll loop.
    async fn refetch_snapshot(&mut self) {
        match self.gateway.fetch_snapshot().await {
            Ok(snapshot) => self.apply_snapshot(&snapshot),
            Err(e) => tracing::warn!("failed to refresh snapshot: {e:#}"),
        }
    }

    async fn teardown(&mut self) {
        if let Some(user_id) = self.user_id {
            if let Err(e) = self.gateway.mark_inactive(user_id).await {
                tracing::warn!("failed to mark user {user_id} inactive: {e:#}");
            }
        }
        if let Some(watch) = self.watch.take() {
            watch.cancel();
        }
    }
}
