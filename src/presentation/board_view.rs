// Board view state shared between the session and the terminal screen
use crate::application::view::{BoardView, StatusLine};
use crate::domain::board::{JoinAlert, ZoneSummary};
use crate::domain::zone::Rgb;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const EMPTY_SUMMARY: &str = "No one is here yet - be the first to check in!";

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    posted_at: Instant,
}

impl Notice {
    fn new(message: String) -> Self {
        Self {
            message,
            posted_at: Instant::now(),
        }
    }

    #[cfg(test)]
    fn aged(message: String, age: Duration) -> Self {
        Self {
            message,
            posted_at: Instant::now() - age,
        }
    }
}

/// Everything the screen shows around the canvas. Writes come from the
/// session, reads happen at present time; both sides only ever hold the lock
/// for an assignment.
#[derive(Debug, Default)]
pub struct ViewState {
    pub user_line: Option<String>,
    pub status_line: Option<String>,
    pub summary_lines: Vec<String>,
    /// Standing join alerts, replaced wholesale on every snapshot. Tinted
    /// with the zone color.
    pub alert_lines: Vec<(String, Rgb)>,
    pub notices: Vec<Notice>,
}

impl ViewState {
    /// Drop notices older than the TTL. Called every frame, so expiry
    /// resolution is one frame period. Alert lines never expire; they are
    /// only ever replaced by the next snapshot.
    pub fn prune_notices(&mut self, ttl: Duration) {
        self.notices.retain(|n| n.posted_at.elapsed() < ttl);
    }
}

pub fn format_status(status: &StatusLine) -> String {
    match status {
        StatusLine::Active(message) => format!("📍 {message}"),
        StatusLine::Inactive(message) => format!("⚠️ {message}"),
    }
}

pub fn format_summary(summaries: &[ZoneSummary]) -> Vec<String> {
    if summaries.is_empty() {
        return vec![EMPTY_SUMMARY.to_string()];
    }

    summaries
        .iter()
        .map(|summary| {
            let chips: Vec<String> = summary
                .people
                .iter()
                .map(|p| format!("{} {}", p.avatar(), p.name))
                .collect();
            format!(
                "{} {} ({}): {}",
                summary.zone.icon(),
                summary.zone.display_name(),
                summary.people.len(),
                chips.join(", ")
            )
        })
        .collect()
}

pub fn format_alerts(alerts: &[JoinAlert]) -> Vec<(String, Rgb)> {
    alerts
        .iter()
        .map(|alert| {
            (
                format!("🎉 {} people at {} - JOIN THEM!", alert.count, alert.place),
                alert.zone.color(),
            )
        })
        .collect()
}

/// The session-facing half of the terminal view.
#[derive(Clone)]
pub struct SharedView {
    state: Arc<Mutex<ViewState>>,
}

impl SharedView {
    pub fn new(state: Arc<Mutex<ViewState>>) -> Self {
        Self { state }
    }
}

impl BoardView for SharedView {
    fn set_status(&self, status: StatusLine) {
        if let Ok(mut state) = self.state.lock() {
            state.status_line = Some(format_status(&status));
        }
    }

    fn set_user(&self, name: &str, current_zone: Option<&str>) {
        if let Ok(mut state) = self.state.lock() {
            state.user_line = Some(match current_zone {
                Some(zone) => format!("👤 {name} — {zone}"),
                None => format!("👤 {name}"),
            });
        }
    }

    fn set_summary(&self, summaries: &[ZoneSummary]) {
        if let Ok(mut state) = self.state.lock() {
            state.summary_lines = format_summary(summaries);
        }
    }

    fn set_alerts(&self, alerts: &[JoinAlert]) {
        if let Ok(mut state) = self.state.lock() {
            state.alert_lines = format_alerts(alerts);
        }
    }

    fn push_notice(&self, message: String) {
        if let Ok(mut state) = self.state.lock() {
            state.notices.push(Notice::new(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::person::Person;
    use crate::domain::zone::ZoneType;

    #[test]
    fn test_summary_line_shape() {
        let summaries = vec![ZoneSummary {
            zone: ZoneType::Pub,
            people: vec![Person {
                id: 1,
                name: "Ada Lovelace".to_string(),
                avatar_emoji: Some("🦆".to_string()),
                current_zone: None,
            }],
        }];
        let lines = format_summary(&summaries);
        assert_eq!(lines, vec!["🍺 At the Pub (1): 🦆 Ada Lovelace".to_string()]);
    }

    #[test]
    fn test_empty_summary_placeholder() {
        assert_eq!(format_summary(&[]), vec![EMPTY_SUMMARY.to_string()]);
    }

    #[test]
    fn test_alert_line_carries_zone_color() {
        let alerts = vec![JoinAlert {
            zone: ZoneType::Pub,
            place: "The Anchor".to_string(),
            count: 2,
        }];
        assert_eq!(
            format_alerts(&alerts),
            vec![(
                "🎉 2 people at The Anchor - JOIN THEM!".to_string(),
                ZoneType::Pub.color(),
            )]
        );
    }

    #[test]
    fn test_alerts_replace_rather_than_accumulate() {
        let state = Arc::new(Mutex::new(ViewState::default()));
        let view = SharedView::new(state.clone());
        let alert = JoinAlert {
            zone: ZoneType::Cafe,
            place: "lunch".to_string(),
            count: 3,
        };

        view.set_alerts(std::slice::from_ref(&alert));
        view.set_alerts(std::slice::from_ref(&alert));
        assert_eq!(state.lock().unwrap().alert_lines.len(), 1);

        view.set_alerts(&[]);
        assert!(state.lock().unwrap().alert_lines.is_empty());
    }

    #[test]
    fn test_notices_expire_after_ttl() {
        let mut state = ViewState::default();
        state
            .notices
            .push(Notice::aged("old".to_string(), Duration::from_secs(10)));
        state.notices.push(Notice::new("fresh".to_string()));

        state.prune_notices(Duration::from_secs(5));

        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].message, "fresh");
    }

    #[test]
    fn test_status_prefixes() {
        assert_eq!(
            format_status(&StatusLine::Active("51.5034, -0.1276".to_string())),
            "📍 51.5034, -0.1276"
        );
        assert_eq!(
            format_status(&StatusLine::Inactive("Location timeout".to_string())),
            "⚠️ Location timeout"
        );
    }
}
