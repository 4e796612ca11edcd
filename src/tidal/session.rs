use std::{path::PathBuf, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, Error, Result},
    management::{CredentialStore, Credentials},
    tidal::{
        auth::{self, TokenGrant},
        transport::{RawResponse, Request, Transport},
    },
    types::{AudioQuality, LoginCode, Token, VideoQuality},
};

/// Extra seconds added to the poll interval on a `slow_down` answer.
const SLOW_DOWN_STEP_SECS: u64 = 5;

/// Everything a [`Session`] needs that is not obtained from the server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub auth_url: String,
    pub scope: String,
    /// Refresh this many seconds before the token actually expires.
    pub refresh_margin_secs: i64,
    pub timeout: Duration,
    pub persistent_file: PathBuf,
    pub country_code: String,
    pub audio_quality: AudioQuality,
    pub video_quality: VideoQuality,
}

impl SessionConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        SessionConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: "https://api.tidal.com/v1".to_string(),
            auth_url: "https://auth.tidal.com/v1/oauth2".to_string(),
            scope: "r_usr w_usr w_sub".to_string(),
            refresh_margin_secs: 60,
            timeout: Duration::from_secs(30),
            persistent_file: PathBuf::from("persistent.json"),
            country_code: "US".to_string(),
            audio_quality: AudioQuality::default(),
            video_quality: VideoQuality::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    AwaitingUserAuthorization,
    Authenticated,
    Expired,
    /// Terminal. Build a new session to log in again.
    LoggedOut,
}

/// The single active session: credentials, their lifecycle and the
/// authenticated request boundary.
///
/// Methods that may refresh the token take `&mut self`, so one session
/// serves one sequential caller. Share it behind
/// `Arc<tokio::sync::Mutex<Session>>` to serialize concurrent callers.
pub struct Session {
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    state: SessionState,
    demo: bool,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let mut credentials = Credentials::new(config.client_id.clone(), config.client_secret.clone());
        credentials.country_code = config.country_code.clone();
        credentials.audio_quality = config.audio_quality;
        credentials.video_quality = config.video_quality;

        let store = CredentialStore::new(credentials, config.persistent_file.clone());

        Session {
            config,
            transport,
            store,
            state: SessionState::Unauthenticated,
            demo: false,
        }
    }

    /// Creates a session that authenticates with the client id only.
    ///
    /// Catalogue endpoints work; user endpoints and streams do not.
    pub fn demo(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let mut session = Self::new(config, transport);
        session.demo = true;
        session
    }

    /// Restores a session from the configured credential file.
    ///
    /// Fails with [`Error::Persistence`] when the file is missing or corrupt.
    pub async fn restore(config: SessionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let store = CredentialStore::load_persisted(
            &config.persistent_file,
            config.client_id.clone(),
            config.client_secret.clone(),
        )
        .await?;

        let expired = store
            .token()
            .map(|t| t.is_expired_at(Utc::now().timestamp(), config.refresh_margin_secs))
            .unwrap_or(true);

        Ok(Session {
            config,
            transport,
            store,
            state: if expired {
                SessionState::Expired
            } else {
                SessionState::Authenticated
            },
            demo: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        self.store.credentials()
    }

    pub fn token(&self) -> Option<&Token> {
        self.store.token()
    }

    pub fn country_code(&self) -> &str {
        &self.store.credentials().country_code
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// User id of the logged-in user, required by user-scoped endpoints.
    pub fn user_id(&self) -> Result<u64> {
        if self.demo {
            return Err(AuthError::NotAuthenticated.into());
        }
        self.store
            .credentials()
            .user_id
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    pub fn set_audio_quality(&mut self, quality: AudioQuality) {
        self.store.credentials_mut().audio_quality = quality;
    }

    pub fn set_video_quality(&mut self, quality: VideoQuality) {
        self.store.credentials_mut().video_quality = quality;
    }

    /// Requests a device-code / user-code pair. Does not change the state.
    pub async fn create_login_code(&self) -> Result<LoginCode> {
        self.check_not_logged_out()?;
        auth::request_device_code(self.transport.as_ref(), &self.config).await
    }

    /// Exchanges a device code for a token.
    ///
    /// On success the session becomes `Authenticated` and the credentials are
    /// persisted. [`AuthError::Pending`] leaves the state untouched; denial
    /// or expiry returns the session to `Unauthenticated`.
    pub async fn create_token(&mut self, device_code: &str) -> Result<Token> {
        self.check_not_logged_out()?;

        match auth::exchange_device_code(self.transport.as_ref(), &self.config, device_code).await {
            Ok(grant) => {
                let token = self.install_grant(grant).await;
                self.demo = false;
                self.state = SessionState::Authenticated;
                info!(user_id = ?self.store.credentials().user_id, "logged in");
                Ok(token)
            }
            Err(Error::Auth(err)) if err.is_pending() => Err(err.into()),
            Err(Error::Auth(err)) => {
                self.state = SessionState::Unauthenticated;
                Err(err.into())
            }
            Err(err) => Err(err),
        }
    }

    /// Polls [`create_token`](Self::create_token) until the user authorizes
    /// the code, the code expires, or `cancel` fires.
    pub async fn authorize(&mut self, code: &LoginCode, cancel: &CancellationToken) -> Result<Token> {
        self.check_not_logged_out()?;
        self.state = SessionState::AwaitingUserAuthorization;

        let deadline = tokio::time::Instant::now() + Duration::from_secs(code.expires_in);
        let mut interval = Duration::from_secs(code.interval.max(1));

        loop {
            match self.create_token(&code.device_code).await {
                Ok(token) => return Ok(token),
                Err(Error::Auth(AuthError::Pending)) => {
                    debug!("authorization pending");
                }
                Err(Error::Auth(AuthError::SlowDown)) => {
                    interval += Duration::from_secs(SLOW_DOWN_STEP_SECS);
                    debug!(interval_secs = interval.as_secs(), "slowing down polling");
                }
                Err(err) => {
                    self.state = SessionState::Unauthenticated;
                    return Err(err);
                }
            }

            if tokio::time::Instant::now() + interval > deadline {
                self.state = SessionState::Unauthenticated;
                return Err(AuthError::Expired.into());
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    self.state = SessionState::Unauthenticated;
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Replaces the current token with the result of a refresh exchange and
    /// persists it.
    pub async fn refresh_token(&mut self) -> Result<Token> {
        self.check_not_logged_out()?;

        let refresh_token = self
            .store
            .token()
            .map(|t| t.refresh_token.clone())
            .ok_or(AuthError::NotAuthenticated)?;

        let grant =
            auth::exchange_refresh_token(self.transport.as_ref(), &self.config, &refresh_token).await?;
        let token = self.install_grant(grant).await;
        self.state = SessionState::Authenticated;
        info!(expires_at = token.expires_at, "refreshed access token");
        Ok(token)
    }

    /// Refreshes the token if it expired or expires within the margin.
    ///
    /// Every authenticated request goes through this first. A failed refresh
    /// fails the request with an authentication error; the stale token is
    /// never used.
    pub async fn ensure_fresh(&mut self) -> Result<()> {
        self.ensure_fresh_at(Utc::now()).await
    }

    pub async fn ensure_fresh_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.check_not_logged_out()?;
        if self.demo {
            return Ok(());
        }

        let token = self.store.token().ok_or(AuthError::NotAuthenticated)?;
        if !token.is_expired_at(now.timestamp(), self.config.refresh_margin_secs) {
            return Ok(());
        }

        debug!(expires_at = token.expires_at, "access token expired");
        self.state = SessionState::Expired;

        match self.refresh_token().await {
            Ok(_) => Ok(()),
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(Error::Auth(err)) => Err(err.into()),
            Err(err) => Err(AuthError::Rejected(format!("refresh failed: {}", err)).into()),
        }
    }

    /// Sends an authenticated request: refresh if needed, attach the
    /// credentials, perform.
    pub async fn execute(&mut self, request: Request) -> Result<RawResponse> {
        self.ensure_fresh().await?;
        let request = self.authorize_request(request)?;
        self.transport.perform(request).await
    }

    /// Like [`execute`](Self::execute), giving up when `cancel` fires.
    ///
    /// Only the request itself is cancellable. A refresh that has started
    /// always completes, so a rotated refresh token is never lost.
    pub async fn execute_cancellable(
        &mut self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        self.ensure_fresh().await?;
        let request = self.authorize_request(request)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.transport.perform(request) => result,
        }
    }

    /// Invalidates the token server-side and ends the session.
    ///
    /// The request goes through [`execute`](Self::execute), so an expired
    /// token is refreshed first. The session ends locally even when the
    /// refresh or the logout request fails; that error is returned.
    pub async fn logout(&mut self) -> Result<()> {
        self.check_not_logged_out()?;

        let result = if self.demo || self.store.token().is_none() {
            Ok(())
        } else {
            let request = auth::logout_request(&self.config);
            self.execute(request)
                .await
                .and_then(|response| auth::check_logout(&response))
        };

        self.shutdown();
        info!("logged out");
        result
    }

    /// Ends the session locally without contacting the server.
    pub fn shutdown(&mut self) {
        self.store.clear();
        self.state = SessionState::LoggedOut;
    }

    fn authorize_request(&self, request: Request) -> Result<Request> {
        if self.demo {
            return Ok(request.header("x-tidal-token", &self.config.client_id));
        }
        let token = self.store.token().ok_or(AuthError::NotAuthenticated)?;
        Ok(request.header("authorization", format!("Bearer {}", token.access_token)))
    }

    async fn install_grant(&mut self, grant: TokenGrant) -> Token {
        let token = grant.token.clone();
        {
            let credentials = self.store.credentials_mut();
            if grant.user_id.is_some() {
                credentials.user_id = grant.user_id;
            }
            if let Some(country_code) = grant.country_code {
                credentials.country_code = country_code;
            }
        }
        self.store.replace_token(grant.token);

        if let Err(e) = self.store.save_persisted().await {
            warn!(error = %e, "could not persist credentials");
        }
        token
    }

    fn check_not_logged_out(&self) -> Result<()> {
        if self.state == SessionState::LoggedOut {
            Err(AuthError::LoggedOut.into())
        } else {
            Ok(())
        }
    }
}
