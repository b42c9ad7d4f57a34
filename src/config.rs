//! Command-line and environment configuration for the radar host.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::Ipv6Addr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

/// Path of the radar hub on the telemetry server.
pub const HUB_PATH: &str = "/hub/0f908ff7-e614-6a93-60a3-cee36c9cea91";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid hub URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("host must not be empty")]
    EmptyHost,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "webradar", about = "Headless tactical radar client")]
pub struct Cli {
    /// Telemetry server host name or IP address.
    #[arg(long, env = "RADAR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "RADAR_PORT", default_value_t = 55555)]
    pub port: u16,

    #[arg(long, env = "RADAR_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Name of the entity the view follows; falls back to the first entity.
    #[arg(long, env = "RADAR_LOCAL_NAME", default_value = "")]
    pub local_name: String,

    /// Directory holding map calibration records.
    #[arg(long, env = "RADAR_MAPS_DIR", default_value = "Maps")]
    pub maps_dir: PathBuf,

    #[arg(long, env = "RADAR_UI_SCALE", default_value_t = 1.0)]
    pub ui_scale: f64,

    #[arg(long, env = "RADAR_ZOOM", default_value_t = 1.0)]
    pub zoom: f64,

    /// Frames rendered per second.
    #[arg(long, env = "RADAR_FPS", default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    #[arg(long, env = "RADAR_WIDTH", default_value_t = 1920)]
    pub width: u32,

    #[arg(long, env = "RADAR_HEIGHT", default_value_t = 1080)]
    pub height: u32,

    /// Reconnect attempts after a dropped connection before giving up.
    #[arg(long, env = "RADAR_MAX_RECONNECTS", default_value_t = 4)]
    pub max_reconnects: u32,
}

impl Cli {
    /// Websocket URL of the radar hub, with the password as a query parameter.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host is blank or the pieces do not form a URL.
    pub fn hub_url(&self) -> Result<Url, ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        let mut url = Url::parse(&format!("ws://{}:{}{HUB_PATH}", format_host_for_url(host), self.port))?;
        url.query_pairs_mut().append_pair("password", &self.password);
        Ok(url)
    }

    /// Interval between rendered frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Bracket IPv6 literals so they can sit in the authority part of a URL.
#[must_use]
pub fn format_host_for_url(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]")
    } else {
        host.to_owned()
    }
}
