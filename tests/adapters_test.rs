mod common;

use std::sync::{Arc, Mutex};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;
use tempfile::tempdir;
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

use common::{ScriptedTransport, logged_in_session, test_config, track_json};
use tidlcli::{
    AuthError, Error,
    tidal::{
        DomainStatus, FavoriteKind, Method, Session, artists, favorites, mixes, playlists, tracks,
        users, videos,
    },
};

#[tokio::test]
async fn test_artist_top_tracks_page() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({
            "limit": 2, "offset": 4, "totalNumberOfItems": 30,
            "items": [track_json(5), track_json(6)],
        }),
    );

    let content = artists::get_artist_top_tracks(&mut session, 7, 2, 4).await.unwrap();

    assert_eq!(content.items().len(), 2);
    assert_eq!(content.items()[1].id, 6);
    assert_eq!(content.offset, Some(4));
    assert_eq!(content.total_number_of_items, Some(30));

    let request = transport.last_request();
    assert_eq!(request.url, "https://api.test/v1/artists/7/toptracks");
    assert_eq!(request.query_value("countryCode"), Some("US"));
    assert_eq!(request.query_value("offset"), Some("4"));
}

#[tokio::test]
async fn test_artist_links_and_mix() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({
            "items": [
                { "url": "https://artist.test", "siteName": "OFFICIAL_HOMEPAGE" },
                { "url": "https://social.test/artist" },
            ],
        }),
    );
    transport.push(200, json!({ "id": "mix-7", "title": "Artist Radio" }));

    let links = artists::get_artist_links(&mut session, 7, 10, 0).await.unwrap();
    assert_eq!(links.links().len(), 2);
    assert_eq!(links.links()[0].site_name.as_deref(), Some("OFFICIAL_HOMEPAGE"));
    assert_eq!(links.links()[1].site_name, None);

    let mix = artists::get_artist_mix(&mut session, 7).await.unwrap();
    assert_eq!(mix.mixes()[0].id, "mix-7");
    assert_eq!(transport.last_request().url, "https://api.test/v1/artists/7/mix");
}

#[tokio::test]
async fn test_track_credits_from_bare_array() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!([
            { "type": "Producer", "contributors": [{ "name": "A", "id": 1 }, { "name": "B" }] },
            { "type": "Composer", "contributors": [] },
        ]),
    );

    let content = tracks::get_track_credits(&mut session, 1).await.unwrap();

    assert!(content.is_success());
    assert_eq!(content.credits().len(), 2);
    assert_eq!(content.credits()[0].role, "Producer");
    assert_eq!(content.credits()[0].contributors[1].id, None);
}

#[tokio::test]
async fn test_track_contributors_page() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({ "items": [{ "name": "First Artist", "role": "Main Artist" }], "totalNumberOfItems": 1 }),
    );

    let content = tracks::get_track_contributors(&mut session, 1, 50, 0).await.unwrap();

    assert_eq!(content.contributors()[0].role.as_deref(), Some("Main Artist"));
    assert_eq!(transport.last_request().url, "https://api.test/v1/tracks/1/contributors");
}

#[tokio::test]
async fn test_unexpected_list_shape_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, json!({ "items": { "not": "a list" } }));

    let result = tracks::get_track_contributors(&mut session, 1, 50, 0).await;
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[tokio::test]
async fn test_video_and_video_stream() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, json!({ "id": 5, "title": "Clip", "duration": 180, "imageId": "img" }));
    transport.push(
        200,
        json!({
            "videoId": 5,
            "videoQuality": "HIGH",
            "manifestMimeType": "application/vnd.tidal.emu",
            "manifest": STANDARD.encode(json!({ "urls": ["https://cdn.test/5.m3u8"] }).to_string()),
        }),
    );

    let video = videos::get_video(&mut session, 5).await.unwrap();
    assert!(video.items()[0].is_video());

    let content = videos::get_video_stream(&mut session, 5).await.unwrap();
    let stream = content.stream().unwrap();
    assert_eq!(stream.id, 5);
    assert_eq!(stream.quality, "HIGH");
    assert_eq!(stream.urls, vec!["https://cdn.test/5.m3u8".to_string()]);

    let request = transport.last_request();
    assert_eq!(request.url, "https://api.test/v1/videos/5/playbackinfopostpaywall");
    assert_eq!(request.query_value("videoquality"), Some("HIGH"));
}

#[tokio::test]
async fn test_video_contributors_not_found() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(404, json!({ "status": 404, "subStatus": 2001, "userMessage": "Video not found" }));

    let content = videos::get_video_contributors(&mut session, 99, 10, 0).await.unwrap();

    assert_eq!(content.status(), DomainStatus::NotFound);
    assert!(content.contributors().is_empty());
    assert_eq!(content.message(), Some("resource 99 not found: Video not found"));
}

#[tokio::test]
async fn test_mix_items_skip_missing_entries() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({
            "items": [
                { "item": track_json(1), "type": "track" },
                { "item": null, "type": "track" },
                { "type": "video" },
                { "item": track_json(2), "type": "track" },
            ],
        }),
    );

    let content = mixes::get_mix_items(&mut session, "mix-7").await.unwrap();

    let ids: Vec<u64> = content.items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(transport.last_request().url, "https://api.test/v1/mixes/mix-7/items");
}

#[tokio::test]
async fn test_get_user_profile() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({ "id": 42, "username": "listener", "firstName": "Ada", "countryCode": "US" }),
    );

    let content = users::get_user(&mut session).await.unwrap();

    let user = content.user().unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert_eq!(user.last_name, None);
    assert_eq!(transport.last_request().url, "https://api.test/v1/users/42");
}

#[tokio::test]
async fn test_user_endpoints_need_a_user() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::demo(test_config(dir.path()), transport.clone());

    let result = users::get_user(&mut session).await;

    assert!(matches!(result, Err(Error::Auth(AuthError::NotAuthenticated))));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_create_and_delete_playlist() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        201,
        json!({ "uuid": "uuid-new", "title": "Road Trip", "description": "songs", "numberOfTracks": 0 }),
    );
    transport.push_raw(204, "");

    let created = playlists::create_playlist(&mut session, "Road Trip", "songs").await.unwrap();
    assert!(created.is_success());
    assert_eq!(created.playlists()[0].uuid, "uuid-new");

    let request = transport.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.test/v1/users/42/playlists");
    assert_eq!(request.form_value("title"), Some("Road Trip"));

    let status = playlists::delete_playlist(&mut session, "uuid-new").await.unwrap();
    assert_eq!(status, DomainStatus::Success);
    assert_eq!(transport.last_request().method, Method::Delete);
}

#[tokio::test]
async fn test_move_playlist_item_sends_etag() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push_raw(200, "");

    let status = playlists::move_playlist_item(&mut session, "uuid-1", 3, 0, "17")
        .await
        .unwrap();

    assert!(status.is_success());
    let request = transport.last_request();
    assert_eq!(request.url, "https://api.test/v1/playlists/uuid-1/items/3");
    assert_eq!(request.form_value("toIndex"), Some("0"));
    assert_eq!(request.header_value("If-None-Match"), Some("17"));
}

#[tokio::test]
async fn test_delete_favorite() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push_raw(200, "");
    transport.push(404, json!({ "userMessage": "not a favorite" }));

    let status = favorites::delete_favorite(&mut session, FavoriteKind::Albums, "900")
        .await
        .unwrap();
    assert!(status.is_success());
    assert_eq!(
        transport.last_request().url,
        "https://api.test/v1/users/42/favorites/albums/900"
    );

    let status = favorites::delete_favorite(&mut session, FavoriteKind::Albums, "901")
        .await
        .unwrap();
    assert_eq!(status, DomainStatus::NotFound);
}

#[test]
fn test_favorite_kind_parsing() {
    assert_eq!("Tracks".parse::<FavoriteKind>(), Ok(FavoriteKind::Tracks));
    assert_eq!("playlist".parse::<FavoriteKind>(), Ok(FavoriteKind::Playlists));
    assert!("songs".parse::<FavoriteKind>().is_err());
    assert_eq!(FavoriteKind::Videos.to_string(), "videos");
}

#[tokio::test]
async fn test_user_subscription() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({
            "startDate": "2024-01-01T00:00:00.000+0000",
            "validUntil": "2026-12-01T00:00:00.000+0000",
            "status": "ACTIVE",
            "subscription": { "type": "HIFI", "offlineGracePeriod": 30 },
            "highestSoundQuality": "HI_RES",
            "premiumAccess": true,
            "canGetTrial": false,
            "paymentType": "ADYEN_CREDIT_CARD",
        }),
    );

    let content = users::get_user_subscription(&mut session).await.unwrap();

    let subscription = content.subscription().unwrap();
    assert_eq!(subscription.status.as_deref(), Some("ACTIVE"));
    assert_eq!(subscription.highest_sound_quality.as_deref(), Some("HI_RES"));
    assert!(subscription.premium_access);
    assert!(!subscription.can_get_trial);
    let plan = subscription.plan.as_ref().unwrap();
    assert_eq!(plan.kind.as_deref(), Some("HIFI"));
    assert_eq!(plan.offline_grace_period, Some(30));

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api.test/v1/users/42/subscription");
}

#[tokio::test]
async fn test_user_subscription_needs_a_login() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = Session::new(test_config(dir.path()), transport.clone());

    let result = users::get_user_subscription(&mut session).await;

    assert!(matches!(result, Err(Error::Auth(AuthError::NotAuthenticated))));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_user_mixes_from_page() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(
        200,
        json!({
            "rows": [
                { "modules": [{ "type": "PAGE_LINKS" }] },
                {
                    "modules": [{
                        "pagedList": {
                            "limit": 50, "offset": 0, "totalNumberOfItems": 2,
                            "items": [{ "id": "m1", "title": "My Mix 1" }, { "id": "m2" }],
                        },
                    }],
                },
            ],
        }),
    );

    let content = mixes::get_user_mixes(&mut session).await.unwrap();

    assert!(content.is_success());
    assert_eq!(content.mixes().len(), 2);
    assert_eq!(content.mixes()[0].id, "m1");
    assert_eq!(content.mixes()[0].title.as_deref(), Some("My Mix 1"));
    assert_eq!(content.mixes()[1].title, None);
    assert_eq!(content.limit, Some(50));
    assert_eq!(content.total_number_of_items, Some(2));

    let request = transport.last_request();
    assert_eq!(request.url, "https://api.test/v1/pages/my_collection_my_mixes");
    assert_eq!(request.query_value("deviceType"), Some("BROWSER"));
}

#[tokio::test]
async fn test_user_mixes_page_without_list() {
    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(200, json!({ "rows": [{ "modules": [{ "type": "PAGE_LINKS" }] }] }));

    let content = mixes::get_user_mixes(&mut session).await.unwrap();

    assert!(content.is_success());
    assert!(content.mixes().is_empty());
    assert_eq!(content.total_number_of_items, None);
}

/// Collects the `user_message` of every "classified response" event.
#[derive(Clone, Default)]
struct ClassifiedResponses(Arc<Mutex<Vec<Option<String>>>>);

impl<S: Subscriber> Layer<S> for ClassifiedResponses {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventFields::default();
        event.record(&mut visitor);
        if visitor.message.as_deref() == Some("classified response") {
            self.0.lock().unwrap().push(visitor.user_message);
        }
    }
}

#[derive(Default)]
struct EventFields {
    message: Option<String>,
    user_message: Option<String>,
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "user_message" => self.user_message = Some(value.to_string()),
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_failed_fetch_is_classified_once() {
    let events = ClassifiedResponses::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

    let dir = tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let mut session = logged_in_session(dir.path(), transport.clone()).await;
    transport.push(404, json!({ "status": 404, "subStatus": 2001, "userMessage": "Track not found" }));

    let content = tracks::get_track(&mut session, 404).await.unwrap();

    assert_eq!(content.status(), DomainStatus::NotFound);
    let events = events.0.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_deref(), Some("Track not found"));
}
