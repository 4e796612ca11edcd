#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Value, json};
use tidlcli::{
    Error, Result,
    tidal::{RawResponse, Request, Session, SessionConfig, Transport},
    utils,
};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";

/// In-memory transport replaying canned responses in order and recording
/// every request it was handed.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: Value) {
        self.push_response(RawResponse::new(status, body.to_string()));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.push_response(RawResponse::new(status, body));
    }

    pub fn push_response(&self, response: RawResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, request: Request) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response left".to_string())))
    }
}

pub fn test_config(dir: &Path) -> SessionConfig {
    let mut config = SessionConfig::new(CLIENT_ID, CLIENT_SECRET);
    config.api_url = "https://api.test/v1".to_string();
    config.auth_url = "https://auth.test/v1/oauth2".to_string();
    config.persistent_file = dir.join("persistent.json");
    config
}

/// Writes a credential file whose token expires at `expires_at`.
pub fn write_credentials(path: &Path, access_token: &str, expires_at: i64) {
    let document = json!({
        "user_id": 42,
        "country_code": "US",
        "audio_quality": "HIGH",
        "video_quality": "HIGH",
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "expires_at": expires_at,
    });
    std::fs::write(path, document.to_string()).unwrap();
}

/// A restored session whose token is valid for another hour.
pub async fn logged_in_session(dir: &Path, transport: Arc<ScriptedTransport>) -> Session {
    let config = test_config(dir);
    write_credentials(&config.persistent_file, "access-1", utils::now_timestamp() + 3600);
    Session::restore(config, transport).await.unwrap()
}

pub fn token_response(access_token: &str, refresh_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "user": { "userId": 42, "countryCode": "DE" },
    })
}

pub fn track_json(id: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Track {}", id),
        "duration": 215,
        "trackNumber": id,
        "artists": [
            { "id": 1, "name": "First Artist" },
            { "id": 2, "name": "Second Artist" },
        ],
        "album": { "id": 900, "title": "Some Album", "cover": "ab-cd" },
    })
}
