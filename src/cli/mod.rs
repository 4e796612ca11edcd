//! # CLI Module
//!
//! User-facing commands of `tidlcli`. Each command opens a [`Session`],
//! calls one or more endpoint adapters from [`crate::tidal`] and renders
//! the returned [`ContentAggregate`] as tables.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`login`] - Runs the device-code flow and stores the credentials
//! - [`logout`] - Invalidates the token and removes the credential file
//! - [`whoami`] - Shows the logged-in user
//!
//! ### Catalogue
//!
//! - [`track`], [`album`], [`artist`], [`mix`] - Show one entity and its items
//! - [`search`] - Search artists, albums, tracks, videos and playlists
//! - [`stream`] - Print the stream URLs of a track or video
//!
//! ### User Library
//!
//! - [`playlist`] and the `playlist_*` commands - Read and edit playlists
//! - [`favorites`] - List, add or remove favorites
//!
//! ## Sessions
//!
//! Catalogue commands accept `--demo` and then run with the client id only.
//! Every other command restores the session stored by `tidlcli login`; the
//! token is refreshed transparently when it is about to expire.
//!
//! ## Error Handling
//!
//! Transport and authentication failures end the command with an
//! `error!`. A non-success [`DomainStatus`] is reported with its code and
//! the server's message.
//!
//! ## Usage Patterns
//!
//! ```bash
//! tidlcli login                       # Authorize this device
//! tidlcli search "daft punk"          # Search the catalogue
//! tidlcli album 17927863              # Show an album and its tracks
//! tidlcli playlist                    # List your playlists
//! tidlcli favorites tracks --add 1234 # Add a favorite track
//! ```

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config, error,
    management::ContentAggregate,
    tidal::{DomainStatus, HttpTransport, Session, SessionConfig},
    warning,
};

mod albums;
mod artists;
mod auth;
mod favorites;
mod playlist;
mod search;
mod tracks;

pub use albums::album;
pub use artists::artist;
pub use artists::ArtistView;
pub use auth::login;
pub use auth::logout;
pub use auth::whoami;
pub use favorites::favorites;
pub use playlist::playlist;
pub use playlist::playlist_add;
pub use playlist::playlist_create;
pub use playlist::playlist_delete;
pub use playlist::playlist_move;
pub use playlist::playlist_remove;
pub use search::search;
pub use tracks::mix;
pub use tracks::stream;
pub use tracks::track;

/// Page size used by listing commands.
pub const PAGE_SIZE: u64 = 50;

fn session_config() -> SessionConfig {
    match config::session_config() {
        Ok(c) => c,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    }
}

fn transport(config: &SessionConfig) -> Arc<HttpTransport> {
    match HttpTransport::new(config.timeout) {
        Ok(t) => Arc::new(t),
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    }
}

/// Restores the stored session, or a demo session when `demo` is set.
async fn open_session(demo: bool) -> Session {
    let config = session_config();
    let transport = transport(&config);

    if demo {
        return Session::demo(config, transport);
    }

    match Session::restore(config, transport).await {
        Ok(session) => session,
        Err(e) => error!(
            "No stored login. Please run tidlcli login\n Error: {}",
            e
        ),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Returns false and prints the diagnostic when the call did not succeed.
fn check(content: &ContentAggregate) -> bool {
    if content.is_success() {
        return true;
    }
    warning!(
        "{}",
        content
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| content.status().to_string())
    );
    false
}

fn report_status(action: &str, status: DomainStatus) {
    if status.is_success() {
        crate::success!("{}", action);
    } else {
        warning!("{} failed: {}", action, status);
    }
}
