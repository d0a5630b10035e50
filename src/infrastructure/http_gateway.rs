// HTTP gateway to the presence server
use crate::application::server_gateway::{ServerEvent, ServerGateway};
use crate::domain::person::UserProfile;
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::event_stream::decode_events;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_event(&self, path: &str, payload: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("failed to send request to {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{path} failed with status {status}: {body}");
        }

        Ok(())
    }
}

#[async_trait]
impl ServerGateway for HttpGateway {
    async fn subscribe(&self) -> Result<mpsc::Receiver<ServerEvent>> {
        let (tx, rx) = mpsc::channel(32);
        let client = self.client.clone();
        let url = self.url("/api/events");

        tokio::spawn(async move {
            let response = match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    tracing::warn!("event subscription refused: {}", response.status());
                    let _ = tx.send(ServerEvent::Disconnected).await;
                    return;
                }
                Err(e) => {
                    tracing::warn!("event subscription failed: {e}");
                    let _ = tx.send(ServerEvent::Disconnected).await;
                    return;
                }
            };

            if tx.send(ServerEvent::Connected).await.is_err() {
                return;
            }

            let events = decode_events(response.bytes_stream());
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                if tx.send(event).await.is_err() {
                    return;
                }
            }

            let _ = tx.send(ServerEvent::Disconnected).await;
        });

        Ok(rx)
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        self.client
            .get(self.url("/api/people"))
            .send()
            .await
            .context("failed to fetch snapshot")?
            .error_for_status()
            .context("snapshot request rejected")?
            .json()
            .await
            .context("failed to parse snapshot")
    }

    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile> {
        self.client
            .get(self.url(&format!("/api/user/{user_id}")))
            .send()
            .await
            .context("failed to fetch user profile")?
            .error_for_status()
            .context("user profile request rejected")?
            .json()
            .await
            .context("failed to parse user profile")
    }

    async fn register(&self, user_id: u64) -> Result<()> {
        self.post_event("/api/register", json!({ "user_id": user_id }))
            .await
    }

    async fn send_location(&self, user_id: u64, latitude: f64, longitude: f64) -> Result<()> {
        self.post_event(
            "/api/location",
            json!({
                "user_id": user_id,
                "latitude": latitude,
                "longitude": longitude,
            }),
        )
        .await
    }

    async fn mark_inactive(&self, user_id: u64) -> Result<()> {
        self.post_event("/api/inactive", json!({ "user_id": user_id }))
            .await
    }
}
