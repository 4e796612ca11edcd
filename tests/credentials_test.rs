use tempfile::tempdir;
use tidlcli::{
    Error,
    management::{CredentialStore, Credentials},
    types::{AudioQuality, Token, VideoQuality},
};

fn credentials() -> Credentials {
    let mut credentials = Credentials::new("client-id".to_string(), "client-secret".to_string());
    credentials.token = Some(Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: 1_900_000_000,
    });
    credentials.user_id = Some(42);
    credentials.country_code = "DE".to_string();
    credentials.audio_quality = AudioQuality::Lossless;
    credentials.video_quality = VideoQuality::Medium;
    credentials
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("persistent.json");

    let store = CredentialStore::new(credentials(), path.clone());
    store.save_persisted().await.unwrap();

    let loaded = CredentialStore::load_persisted(&path, "client-id".to_string(), "client-secret".to_string())
        .await
        .unwrap();
    assert_eq!(loaded.credentials(), &credentials());
    assert_eq!(loaded.path(), path.as_path());

    loaded.save_persisted().await.unwrap();
    let again = CredentialStore::load_persisted(&path, "client-id".to_string(), "client-secret".to_string())
        .await
        .unwrap();
    assert_eq!(again.credentials(), loaded.credentials());
}

#[tokio::test]
async fn test_client_secret_is_never_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("persistent.json");

    CredentialStore::new(credentials(), path.clone())
        .save_persisted()
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("client-secret"));
    assert!(content.contains("\"expires_at\": 1900000000"));
    assert!(content.contains("\"audio_quality\": \"LOSSLESS\""));
}

#[tokio::test]
async fn test_load_missing_file_is_recoverable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let result = CredentialStore::load_persisted(&path, "id".to_string(), "secret".to_string()).await;
    assert!(matches!(result, Err(Error::Persistence(_))));
}

#[tokio::test]
async fn test_load_corrupt_file_is_recoverable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("persistent.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let result = CredentialStore::load_persisted(&path, "id".to_string(), "secret".to_string()).await;
    assert!(matches!(result, Err(Error::Persistence(_))));

    std::fs::write(&path, r#"{"user_id": 1}"#).unwrap();
    let result = CredentialStore::load_persisted(&path, "id".to_string(), "secret".to_string()).await;
    assert!(matches!(result, Err(Error::Persistence(_))));
}

#[tokio::test]
async fn test_save_without_token_fails() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(
        Credentials::new("id".to_string(), "secret".to_string()),
        dir.path().join("persistent.json"),
    );

    assert!(matches!(store.save_persisted().await, Err(Error::Persistence(_))));
}

#[test]
fn test_replace_and_clear_token() {
    let mut store = CredentialStore::new(credentials(), "unused.json".into());

    let fresh = Token::issued("new".to_string(), "r".to_string(), 1_000, 3_600);
    store.replace_token(fresh.clone());
    assert_eq!(store.token(), Some(&fresh));
    assert_eq!(fresh.expires_at, 4_600);

    store.clear();
    assert!(store.token().is_none());
    assert!(store.credentials().user_id.is_none());
    assert_eq!(store.credentials().client_id, "client-id");
}
