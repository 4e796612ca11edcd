//! Configuration management for the TIDAL client.
//!
//! Values come from environment variables, optionally provided through a
//! `.env` file in the local data directory. Resolution order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults (where applicable)
//!
//! The library itself never reads the environment; [`session_config`]
//! collects everything into a [`SessionConfig`] that is handed to
//! [`Session`](crate::tidal::Session).

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use tracing::debug;

use crate::{
    error::{Error, Result},
    tidal::SessionConfig,
    types::{AudioQuality, VideoQuality},
};

const APP_DIR: &str = "tidlcli";

/// Returns the directory holding the `.env` file and the credential file.
///
/// - Linux: `~/.local/share/tidlcli`
/// - macOS: `~/Library/Application Support/tidlcli`
/// - Windows: `%LOCALAPPDATA%/tidlcli`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is
/// not an error: the variables may already be set in the environment.
///
/// # Errors
///
/// Returns [`Error::Config`] if the directory cannot be created or the
/// `.env` file exists but cannot be parsed.
///
/// # Example
///
/// ```rust,ignore
/// use tidlcli::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::Config(format!("{}: {}", dir.display(), e)))?;

    let path = dir.join(".env");
    if !path.is_file() {
        debug!(path = %path.display(), "no .env file, using the process environment");
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// Returns the API client id.
///
/// Retrieves `TIDAL_CLIENT_ID`, the id of the registered application. It
/// is also the only credential a demo session sends.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is not set or empty.
pub fn client_id() -> Result<String> {
    required("TIDAL_CLIENT_ID")
}

/// Returns the API client secret.
///
/// Retrieves `TIDAL_CLIENT_SECRET`. It is required for device-flow login
/// and token refresh, and never written to the credential file.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn client_secret() -> Result<String> {
    required("TIDAL_CLIENT_SECRET")
}

/// Returns the API base URL (`TIDAL_API_URL`).
///
/// Defaults to `https://api.tidal.com/v1`.
pub fn api_url() -> String {
    env::var("TIDAL_API_URL").unwrap_or_else(|_| "https://api.tidal.com/v1".to_string())
}

/// Returns the OAuth2 base URL (`TIDAL_AUTH_URL`).
///
/// Defaults to `https://auth.tidal.com/v1/oauth2`. The device authorization
/// and token endpoints live below it.
pub fn auth_url() -> String {
    env::var("TIDAL_AUTH_URL").unwrap_or_else(|_| "https://auth.tidal.com/v1/oauth2".to_string())
}

/// Returns the OAuth2 scope requested at login (`TIDAL_SCOPE`).
pub fn scope() -> String {
    env::var("TIDAL_SCOPE").unwrap_or_else(|_| "r_usr w_usr w_sub".to_string())
}

/// Seconds before expiry at which the access token is refreshed
/// (`TIDAL_REFRESH_MARGIN_SECS`, default 60).
pub fn refresh_margin_secs() -> Result<i64> {
    parsed("TIDAL_REFRESH_MARGIN_SECS", 60)
}

/// Timeout of a single HTTP exchange (`TIDAL_HTTP_TIMEOUT_SECS`, default 30).
pub fn http_timeout() -> Result<Duration> {
    parsed("TIDAL_HTTP_TIMEOUT_SECS", 30).map(Duration::from_secs)
}

/// Location of the credential file (`TIDAL_PERSISTENT_FILE`).
///
/// Defaults to `<data_dir>/persistent.json`.
pub fn persistent_file() -> PathBuf {
    env::var("TIDAL_PERSISTENT_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("persistent.json"))
}

pub fn audio_quality() -> Result<AudioQuality> {
    parsed("TIDAL_AUDIO_QUALITY", AudioQuality::default())
}

pub fn video_quality() -> Result<VideoQuality> {
    parsed("TIDAL_VIDEO_QUALITY", VideoQuality::default())
}

/// Assembles a [`SessionConfig`] from the environment.
///
/// A missing client secret is tolerated so demo sessions can run with the
/// client id alone.
pub fn session_config() -> Result<SessionConfig> {
    let mut config = SessionConfig::new(client_id()?, client_secret().unwrap_or_default());
    config.api_url = api_url();
    config.auth_url = auth_url();
    config.scope = scope();
    config.refresh_margin_secs = refresh_margin_secs()?;
    config.timeout = http_timeout()?;
    config.persistent_file = persistent_file();
    config.audio_quality = audio_quality()?;
    config.video_quality = video_quality()?;
    Ok(config)
}

fn required(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} must be set", key)))
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
