// Output ports for the rendered board
use crate::domain::board::{JoinAlert, ZoneSummary};
use crate::domain::figure::Figure;

/// Tracking status line shown in the user bar.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLine {
    /// Tracking is active; shows the last fix.
    Active(String),
    /// Anything else: requesting, unsupported, failed.
    Inactive(String),
}

/// The animated canvas. One call per frame; implementations clear, repaint
/// and present synchronously within the tick.
pub trait BoardCanvas: Send {
    fn draw(&mut self, figures: &[Figure], time: f32);
    fn draw_empty(&mut self);
}

/// The summary widgets around the canvas. Implementations with no live
/// target ignore writes rather than failing.
pub trait BoardView: Send + Sync {
    fn set_status(&self, status: StatusLine);
    fn set_user(&self, name: &str, current_zone: Option<&str>);
    fn set_summary(&self, summaries: &[ZoneSummary]);
    /// Replace the standing join-alert set; an empty set clears it. Alerts
    /// stay up as long as their cluster qualifies, unlike notices.
    fn set_alerts(&self, alerts: &[JoinAlert]);
    /// Post a transient notice; implementations expire it after a TTL.
    fn push_notice(&self, message: String);
}
