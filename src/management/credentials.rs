use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    types::{AudioQuality, Token, VideoQuality},
};

/// Session credentials. Only one instance is active per [`Session`](crate::tidal::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub token: Option<Token>,
    pub user_id: Option<u64>,
    pub country_code: String,
    pub audio_quality: AudioQuality,
    pub video_quality: VideoQuality,
}

impl Credentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Credentials {
            client_id,
            client_secret,
            token: None,
            user_id: None,
            country_code: "US".to_string(),
            audio_quality: AudioQuality::default(),
            video_quality: VideoQuality::default(),
        }
    }
}

/// On-disk layout of the credential file.
///
/// The client id and secret are process configuration and never written.
/// `expires_at` is an absolute UNIX timestamp in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedCredentials {
    user_id: Option<u64>,
    country_code: String,
    audio_quality: AudioQuality,
    video_quality: VideoQuality,
    access_token: String,
    refresh_token: String,
    expires_at: i64,
}

pub struct CredentialStore {
    credentials: Credentials,
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(credentials: Credentials, path: PathBuf) -> Self {
        CredentialStore { credentials, path }
    }

    /// Reads the credential file at `path`.
    ///
    /// A missing or corrupt file is a [`Error::Persistence`]; callers fall
    /// back to a fresh login.
    pub async fn load_persisted(path: &Path, client_id: String, client_secret: String) -> Result<Self> {
        let content = async_fs::read_to_string(path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot read credential file");
            Error::Persistence(format!("{}: {}", path.display(), e))
        })?;

        let persisted: PersistedCredentials = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "corrupt credential file");
            Error::Persistence(format!("{}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loaded credentials");

        Ok(CredentialStore {
            credentials: Credentials {
                client_id,
                client_secret,
                token: Some(Token {
                    access_token: persisted.access_token,
                    refresh_token: persisted.refresh_token,
                    expires_at: persisted.expires_at,
                }),
                user_id: persisted.user_id,
                country_code: persisted.country_code,
                audio_quality: persisted.audio_quality,
                video_quality: persisted.video_quality,
            },
            path: path.to_path_buf(),
        })
    }

    /// Writes the credentials to the store's path, creating parent directories.
    pub async fn save_persisted(&self) -> Result<()> {
        let token = self
            .credentials
            .token
            .as_ref()
            .ok_or_else(|| Error::Persistence("no token to persist".to_string()))?;

        let persisted = PersistedCredentials {
            user_id: self.credentials.user_id,
            country_code: self.credentials.country_code.clone(),
            audio_quality: self.credentials.audio_quality,
            video_quality: self.credentials.video_quality,
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: token.expires_at,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::Persistence(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(&persisted)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| Error::Persistence(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }

    /// Replaces the token wholesale. Never mutates the old one in place.
    pub fn replace_token(&mut self, token: Token) {
        self.credentials.token = Some(token);
    }

    /// Forgets the token and the user binding.
    pub fn clear(&mut self) {
        self.credentials.token = None;
        self.credentials.user_id = None;
    }

    pub fn token(&self) -> Option<&Token> {
        self.credentials.token.as_ref()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.credentials
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
