use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub base_url: String,
    /// Signed-in user. Absent means the board runs read-only.
    #[serde(default)]
    pub user_id: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackingSettings {
    /// Minimum interval between outbound position updates.
    #[serde(default = "default_min_send_interval_secs")]
    pub min_send_interval_secs: u64,
    /// Give up on a pending fix after this long.
    #[serde(default = "default_watch_timeout_secs")]
    pub watch_timeout_secs: u64,
    /// Coordinates file for the file-backed position source.
    #[serde(default)]
    pub position_file: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            min_send_interval_secs: default_min_send_interval_secs(),
            watch_timeout_secs: default_watch_timeout_secs(),
            position_file: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Virtual canvas size; surfaces project it onto whatever they have.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f32,
    #[serde(default = "default_frame_period_ms")]
    pub frame_period_ms: u64,
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,
}

fn default_min_send_interval_secs() -> u64 {
    120
}

fn default_watch_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_canvas_width() -> f32 {
    1280.0
}

fn default_canvas_height() -> f32 {
    350.0
}

fn default_frame_period_ms() -> u64 {
    50
}

fn default_notice_ttl_secs() -> u64 {
    5
}

pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/client"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_board_config() -> anyhow::Result<BoardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/board"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
