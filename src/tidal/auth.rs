//! OAuth2 device-code exchanges against the authorization server.
//!
//! These functions only talk to the network and decode the answers. State
//! transitions and persistence belong to [`Session`](super::Session), which
//! calls them.
//!
//! # Flow
//!
//! 1. [`request_device_code`] obtains a device code and a short user code.
//! 2. The user enters the user code at the verification URI on any device.
//! 3. [`exchange_device_code`] is polled with the device code until the
//!    server stops answering `authorization_pending`.
//! 4. [`exchange_refresh_token`] renews the access token when it expires.
//! 5. [`logout_request`] ends the grant.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, Error, Result},
    tidal::{
        session::SessionConfig,
        transport::{RawResponse, Request, Transport},
    },
    types::{LoginCode, Token},
    utils,
};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Token plus the user binding returned by a token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: Token,
    pub user_id: Option<u64>,
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    #[serde(default)]
    user_id: Option<u64>,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenUser {
    #[serde(default)]
    user_id: Option<u64>,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OAuthError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Requests a device-code / user-code pair.
///
/// # Example
///
/// ```rust,ignore
/// let code = request_device_code(transport.as_ref(), &config).await?;
/// println!("Open {} and enter {}", code.link(), code.user_code);
/// ```
pub async fn request_device_code(transport: &dyn Transport, config: &SessionConfig) -> Result<LoginCode> {
    let request = Request::post(format!("{}/device_authorization", config.auth_url))
        .form("client_id", &config.client_id)
        .form("scope", &config.scope);

    let response = transport.perform(request).await?;
    if !is_success(&response) {
        return Err(rejection(&response).into());
    }

    let code: LoginCode = serde_json::from_slice(&response.body)?;
    debug!(user_code = %code.user_code, expires_in = code.expires_in, "issued device code");
    Ok(code)
}

/// Exchanges a device code for a token.
///
/// Returns [`AuthError::Pending`] while the user has not entered the code,
/// [`AuthError::Denied`] or [`AuthError::Expired`] when the flow is over.
pub async fn exchange_device_code(
    transport: &dyn Transport,
    config: &SessionConfig,
    device_code: &str,
) -> Result<TokenGrant> {
    let request = Request::post(format!("{}/token", config.auth_url))
        .form("client_id", &config.client_id)
        .form("device_code", device_code)
        .form("grant_type", DEVICE_CODE_GRANT)
        .form("scope", &config.scope)
        .basic_auth(&config.client_id, &config.client_secret);

    let response = transport.perform(request).await?;
    if !is_success(&response) {
        return Err(rejection(&response).into());
    }

    let grant = decode_grant(&response, None)?;
    info!(user_id = ?grant.user_id, "device authorization completed");
    Ok(grant)
}

/// Exchanges a refresh token for a new access token.
///
/// When the server does not rotate the refresh token, the one passed in is
/// kept in the new [`Token`].
pub async fn exchange_refresh_token(
    transport: &dyn Transport,
    config: &SessionConfig,
    refresh_token: &str,
) -> Result<TokenGrant> {
    let request = Request::post(format!("{}/token", config.auth_url))
        .form("client_id", &config.client_id)
        .form("refresh_token", refresh_token)
        .form("grant_type", "refresh_token")
        .form("scope", &config.scope)
        .basic_auth(&config.client_id, &config.client_secret);

    let response = transport.perform(request).await?;
    if !is_success(&response) {
        let err = rejection(&response);
        warn!(status = response.status, error = %err, "refresh exchange rejected");
        return Err(err.into());
    }

    decode_grant(&response, Some(refresh_token))
}

/// Request invalidating the access token server-side.
///
/// Carries no credentials; [`Session::execute`](super::Session::execute)
/// refreshes the token if needed and attaches it.
pub fn logout_request(config: &SessionConfig) -> Request {
    Request::post(format!("{}/logout", config.api_url))
}

/// Maps the answer to a [`logout_request`].
pub fn check_logout(response: &RawResponse) -> Result<()> {
    if is_success(response) {
        Ok(())
    } else {
        Err(rejection(response).into())
    }
}

fn is_success(response: &RawResponse) -> bool {
    (200..300).contains(&response.status)
}

fn decode_grant(response: &RawResponse, previous_refresh: Option<&str>) -> Result<TokenGrant> {
    let body: TokenResponse = serde_json::from_slice(&response.body)?;

    let refresh_token = body
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .ok_or_else(|| Error::Parse("token response without refresh_token".to_string()))?;

    let (user_id, country_code) = match body.user {
        Some(user) => (user.user_id.or(body.user_id), user.country_code),
        None => (body.user_id, None),
    };

    Ok(TokenGrant {
        token: Token::issued(
            body.access_token,
            refresh_token,
            utils::now_timestamp(),
            body.expires_in,
        ),
        user_id,
        country_code,
    })
}

fn rejection(response: &RawResponse) -> AuthError {
    let body: OAuthError = serde_json::from_slice(&response.body).unwrap_or_default();

    match body.error.as_deref() {
        Some("authorization_pending") => AuthError::Pending,
        Some("slow_down") => AuthError::SlowDown,
        Some("access_denied") => AuthError::Denied,
        Some("expired_token") => AuthError::Expired,
        _ => AuthError::Rejected(format!(
            "HTTP {}: {}",
            response.status,
            body.error_description
                .or(body.error)
                .unwrap_or_else(|| "no error description".to_string())
        )),
    }
}
