mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

use common::{
    CLIENT_ID, ScriptedTransport, logged_in_session, test_config, token_response, write_credentials,
};
use tidlcli::{
    AuthError, Error,
    management::CredentialStore,
    tidal::{Method, Request, Session, SessionState},
    types::LoginCode,
    utils,
};

#[tokio::test]
async fn test_fresh_token_needs_no_network() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    let before = session.token().cloned();

    session.ensure_fresh().await.unwrap();
    session.ensure_fresh().await.unwrap();

    assert_eq!(transport.calls(), 0);
    assert_eq!(session.token().cloned(), before);
    assert_eq!(session.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let path = config.persistent_file.clone();
    write_credentials(&path, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push(200, token_response("access-2", "refresh-2", 3600));

    let mut session = Session::restore(config, transport.clone()).await.unwrap();
    assert_eq!(session.state(), SessionState::Expired);

    session.ensure_fresh().await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://auth.test/v1/oauth2/token");
    assert_eq!(request.form_value("grant_type"), Some("refresh_token"));
    assert_eq!(request.form_value("refresh_token"), Some("refresh-1"));
    assert_eq!(
        request.basic_auth,
        Some((CLIENT_ID.to_string(), common::CLIENT_SECRET.to_string()))
    );

    assert_eq!(session.state(), SessionState::Authenticated);
    let token = session.token().cloned().unwrap();
    assert_eq!(token.access_token, "access-2");
    assert_eq!(token.refresh_token, "refresh-2");
    assert!(token.expires_at > utils::now_timestamp() + 3000);
    assert_eq!(session.country_code(), "DE");

    let reloaded = CredentialStore::load_persisted(&path, CLIENT_ID.to_string(), String::new())
        .await
        .unwrap();
    assert_eq!(reloaded.token(), Some(&token));
}

#[tokio::test]
async fn test_refresh_within_margin() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, token_response("access-2", "refresh-2", 3600));

    // Still valid now, but 3590 seconds from now it is inside the 60 s margin.
    let later = Utc::now() + Duration::seconds(3590);
    session.ensure_fresh_at(later).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(session.token().unwrap().access_token, "access-2");
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, json!({ "access_token": "access-2", "expires_in": 600 }));

    session.refresh_token().await.unwrap();

    assert_eq!(session.token().unwrap().refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_failed_refresh_fails_the_call() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_credentials(&config.persistent_file, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push(
        400,
        json!({ "error": "invalid_grant", "error_description": "refresh token revoked" }),
    );

    let mut session = Session::restore(config, transport.clone()).await.unwrap();
    let result = session.execute(Request::get("https://api.test/v1/tracks/1")).await;

    match result {
        Err(Error::Auth(AuthError::Rejected(message))) => {
            assert!(message.contains("refresh token revoked"), "{}", message)
        }
        other => panic!("expected a rejected refresh, got {:?}", other),
    }
    // Only the refresh exchange went out, never the request with the stale token.
    assert_eq!(transport.calls(), 1);
    assert_eq!(session.token().unwrap().access_token, "stale");
}

#[tokio::test]
async fn test_transport_failure_during_refresh_is_an_auth_error() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_credentials(&config.persistent_file, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push_error(Error::Transport("connection reset".to_string()));

    let mut session = Session::restore(config, transport).await.unwrap();
    let result = session.ensure_fresh().await;

    assert!(
        matches!(result, Err(Error::Auth(AuthError::Rejected(ref m))) if m.starts_with("refresh failed")),
        "{:?}",
        result
    );
}

#[tokio::test]
async fn test_execute_attaches_bearer_token() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, json!({}));

    let response = session
        .execute(Request::get("https://api.test/v1/tracks/1"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let request = transport.last_request();
    assert_eq!(request.header_value("authorization"), Some("Bearer access-1"));
    assert_eq!(request.header_value("x-tidal-token"), None);
}

#[tokio::test]
async fn test_demo_session_sends_client_id() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::demo(test_config(dir.path()), transport.clone());
    transport.push(200, json!({}));

    session.ensure_fresh().await.unwrap();
    session
        .execute(Request::get("https://api.test/v1/albums/1"))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.header_value("x-tidal-token"), Some(CLIENT_ID));
    assert_eq!(request.header_value("authorization"), None);
    assert!(session.is_demo());
    assert!(matches!(
        session.user_id(),
        Err(Error::Auth(AuthError::NotAuthenticated))
    ));
}

#[tokio::test]
async fn test_unauthenticated_session_refuses_requests() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::new(test_config(dir.path()), transport.clone());

    let result = session.execute(Request::get("https://api.test/v1/albums/1")).await;

    assert!(matches!(result, Err(Error::Auth(AuthError::NotAuthenticated))));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_restore_without_file_fails() {
    let dir = tempdir().unwrap();
    let result = Session::restore(test_config(dir.path()), ScriptedTransport::new()).await;
    assert!(matches!(result, Err(Error::Persistence(_))));
}

#[tokio::test]
async fn test_create_token_installs_grant() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let path = config.persistent_file.clone();
    let transport = ScriptedTransport::new();
    let mut session = Session::new(config, transport.clone());
    transport.push(200, token_response("access-1", "refresh-1", 86400));

    let token = session.create_token("device-1").await.unwrap();

    assert_eq!(token.access_token, "access-1");
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.user_id().unwrap(), 42);

    let request = transport.last_request();
    assert_eq!(request.form_value("device_code"), Some("device-1"));
    assert_eq!(
        request.form_value("grant_type"),
        Some("urn:ietf:params:oauth:grant-type:device_code")
    );
    assert!(path.is_file());
}

#[tokio::test]
async fn test_create_token_pending_and_denied() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::new(test_config(dir.path()), transport.clone());

    transport.push(400, json!({ "error": "authorization_pending" }));
    assert!(matches!(
        session.create_token("device-1").await,
        Err(Error::Auth(AuthError::Pending))
    ));

    transport.push(400, json!({ "error": "access_denied" }));
    assert!(matches!(
        session.create_token("device-1").await,
        Err(Error::Auth(AuthError::Denied))
    ));
    assert_eq!(session.state(), SessionState::Unauthenticated);

    transport.push(400, json!({ "error": "expired_token" }));
    assert!(matches!(
        session.create_token("device-1").await,
        Err(Error::Auth(AuthError::Expired))
    ));
}

#[tokio::test]
async fn test_create_login_code() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let session = Session::new(test_config(dir.path()), transport.clone());
    transport.push(
        200,
        json!({
            "deviceCode": "device-1",
            "userCode": "ABCDE",
            "verificationUri": "link.tidal.com",
            "verificationUriComplete": "link.tidal.com/ABCDE",
            "expiresIn": 300,
            "interval": 2,
        }),
    );

    let code = session.create_login_code().await.unwrap();

    assert_eq!(code.device_code, "device-1");
    assert_eq!(code.link(), "https://link.tidal.com/ABCDE");
    assert_eq!(session.state(), SessionState::Unauthenticated);
    let request = transport.last_request();
    assert_eq!(request.url, "https://auth.test/v1/oauth2/device_authorization");
    assert_eq!(request.form_value("client_id"), Some(CLIENT_ID));
}

#[tokio::test]
async fn test_logout_is_terminal() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push_raw(204, "");

    session.logout().await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.url, "https://api.test/v1/logout");
    assert_eq!(request.header_value("authorization"), Some("Bearer access-1"));

    assert_eq!(session.state(), SessionState::LoggedOut);
    assert!(session.token().is_none());
    assert!(matches!(
        session.ensure_fresh().await,
        Err(Error::Auth(AuthError::LoggedOut))
    ));
    assert!(matches!(
        session.create_login_code().await,
        Err(Error::Auth(AuthError::LoggedOut))
    ));
}

#[tokio::test]
async fn test_shutdown_clears_without_network() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;

    session.shutdown();

    assert_eq!(transport.calls(), 0);
    assert_eq!(session.state(), SessionState::LoggedOut);
    assert!(session.credentials().token.is_none());
}

#[tokio::test]
async fn test_cancelled_request_never_reaches_transport() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = session
        .execute_cancellable(Request::get("https://api.test/v1/tracks/1"), &cancel)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_logout_refreshes_an_expired_token_first() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_credentials(&config.persistent_file, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push(200, token_response("access-2", "refresh-2", 3600));
    transport.push_raw(204, "");

    let mut session = Session::restore(config, transport.clone()).await.unwrap();
    session.logout().await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "https://auth.test/v1/oauth2/token");
    assert_eq!(requests[0].form_value("grant_type"), Some("refresh_token"));
    assert_eq!(requests[1].url, "https://api.test/v1/logout");
    assert_eq!(requests[1].header_value("authorization"), Some("Bearer access-2"));
    assert_eq!(session.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn test_logout_with_rejected_refresh_still_ends_the_session() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_credentials(&config.persistent_file, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push(400, json!({ "error": "invalid_grant" }));

    let mut session = Session::restore(config, transport.clone()).await.unwrap();
    let result = session.logout().await;

    assert!(matches!(result, Err(Error::Auth(AuthError::Rejected(_)))));
    assert_eq!(transport.calls(), 1);
    assert_eq!(session.state(), SessionState::LoggedOut);
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_demo_logout_sends_nothing() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::demo(test_config(dir.path()), transport.clone());

    session.logout().await.unwrap();

    assert_eq!(transport.calls(), 0);
    assert_eq!(session.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn test_cancellation_keeps_a_completed_refresh() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let path = config.persistent_file.clone();
    write_credentials(&path, "stale", utils::now_timestamp() - 10);

    let transport = ScriptedTransport::new();
    transport.push(200, token_response("access-2", "refresh-2", 3600));

    let mut session = Session::restore(config, transport.clone()).await.unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = session
        .execute_cancellable(Request::get("https://api.test/v1/tracks/1"), &cancel)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    // only the refresh exchange was sent
    assert_eq!(transport.calls(), 1);
    assert_eq!(session.token().unwrap().refresh_token, "refresh-2");

    let reloaded = CredentialStore::load_persisted(&path, CLIENT_ID.to_string(), String::new())
        .await
        .unwrap();
    assert_eq!(reloaded.token().unwrap().refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_authorize_resets_state_on_transport_error() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    transport.push_error(Error::Transport("connection reset".to_string()));

    let mut session = Session::new(test_config(dir.path()), transport.clone());
    let code = LoginCode {
        device_code: "device-1".to_string(),
        user_code: "ABCDE".to_string(),
        verification_uri: "link.tidal.com".to_string(),
        verification_uri_complete: None,
        expires_in: 300,
        interval: 2,
    };
    let result = session.authorize(&code, &CancellationToken::new()).await;

    assert!(matches!(result, Err(Error::Transport(_))));
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_authorize_resets_state_on_unreadable_grant() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    transport.push_raw(200, "not json");

    let mut session = Session::new(test_config(dir.path()), transport.clone());
    let code = LoginCode {
        device_code: "device-1".to_string(),
        user_code: "ABCDE".to_string(),
        verification_uri: "link.tidal.com".to_string(),
        verification_uri_complete: None,
        expires_in: 300,
        interval: 2,
    };
    let result = session.authorize(&code, &CancellationToken::new()).await;

    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(session.state(), SessionState::Unauthenticated);
}
