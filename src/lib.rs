//! TIDAL Client Library
//!
//! A client for the TIDAL music-streaming API: device-code login with
//! persisted credentials and transparent token refresh, typed access to
//! the catalogue and the user's library, and a command-line front end.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared by every layer
//! - `management` - Result containers, content aggregates and credentials
//! - `tidal` - Session lifecycle, status codes and endpoint adapters
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tidlcli::{config, tidal::{self, HttpTransport, Session}};
//!
//! #[tokio::main]
//! async fn main() -> tidlcli::Res<()> {
//!     config::load_env().await?;
//!     let config = config::session_config()?;
//!     let transport = Arc::new(HttpTransport::new(config.timeout)?);
//!     let mut session = Session::restore(config, transport).await?;
//!
//!     let album = tidal::albums::get_album(&mut session, 17927863).await?;
//!     if album.is_success() {
//!         println!("{}", album.albums()[0].title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod tidal;
pub mod types;
pub mod utils;

pub use error::{AuthError, Error, Result};

/// A convenient Result type alias for the command-line layer.
///
/// Uses a boxed dynamic error trait object so the binary can mix library
/// errors with I/O and parsing errors while keeping Send + Sync bounds for
/// async contexts.
///
/// # Example
///
/// ```rust,ignore
/// use tidlcli::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// # Example
///
/// ```rust,ignore
/// info!("Open {} and enter the code {}", link, code);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a confirmation line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line to stderr and exits with status 1.
///
/// Only for failures the command cannot recover from. The macro never
/// returns, so it can end a `match` arm that must produce a value:
///
/// ```rust,ignore
/// let session = match Session::restore(config, transport).await {
///     Ok(s) => s,
///     Err(e) => error!("No stored login. Please run tidlcli login\n Error: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow warning line to stderr. Execution continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
