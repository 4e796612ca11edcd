//! Build script for the TIDAL command-line client.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory so it sits next to the `.env` file the binary reads.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/tidlcli/`.
///
/// - Linux: `~/.local/share/tidlcli/.env.example`
/// - macOS: `~/Library/Application Support/tidlcli/.env.example`
/// - Windows: `%LOCALAPPDATA%/tidlcli/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tidlcli");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!("cargo:warning=.env.example not found at {}", template.display());
    }

    Ok(())
}
