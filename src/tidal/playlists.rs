//! Playlist catalogue and user playlist editing.
//!
//! Editing calls are guarded by the playlist's ETag: fetch it with
//! [`get_playlist_etag`] and pass it back. A stale ETag answers
//! [`DomainStatus::PreconditionFailed`].

use tracing::debug;

use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::{self, DomainStatus, Outcome, RequestContext},
        transport::Method,
    },
    types::{Item, Playlist},
    utils,
};

/// What the server does with tracks already in the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDuplicates {
    #[default]
    Fail,
    Add,
    Skip,
}

impl OnDuplicates {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnDuplicates::Fail => "FAIL",
            OnDuplicates::Add => "ADD",
            OnDuplicates::Skip => "SKIP",
        }
    }
}

pub async fn get_playlist(session: &mut Session, playlist_id: &str) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("playlists/{}", playlist_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        playlist_id,
        fetch::push_single::<Playlist>,
    )
    .await
}

pub async fn get_playlist_items(
    session: &mut Session,
    playlist_id: &str,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    let request = paged(
        api(session, Method::Get, &format!("playlists/{}/items", playlist_id)),
        limit,
        offset,
    );

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        playlist_id,
        |content, document| fetch::push_page::<Item>(content, document, "items", Nesting::Under("item")),
    )
    .await
}

/// Playlists the user created or marked as favorite.
pub async fn get_user_playlists(session: &mut Session, limit: u64, offset: u64) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = paged(
        api(
            session,
            Method::Get,
            &format!("users/{}/playlistsAndFavoritePlaylists", user_id),
        ),
        limit,
        offset,
    )
    .query("order", "DATE")
    .query("orderDirection", "DESC");

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &user_id.to_string(),
        |content, document| fetch::push_page::<Playlist>(content, document, "items", Nesting::Under("playlist")),
    )
    .await
}

/// Creates a playlist owned by the logged-in user.
pub async fn create_playlist(session: &mut Session, title: &str, description: &str) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = api(session, Method::Post, &format!("users/{}/playlists", user_id))
        .form("title", title)
        .form("description", description);

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &user_id.to_string(),
        fetch::push_single::<Playlist>,
    )
    .await
}

pub async fn delete_playlist(session: &mut Session, playlist_id: &str) -> Result<DomainStatus> {
    let request = api(session, Method::Delete, &format!("playlists/{}", playlist_id));
    fetch::fetch_status(session, request, RequestContext::Index, playlist_id).await
}

/// Reads the current ETag of a playlist.
///
/// Returns the status and, on success, the ETag value. A 200 answer without
/// a usable `ETag` header is reported as [`DomainStatus::Unclassified`].
pub async fn get_playlist_etag(session: &mut Session, playlist_id: &str) -> Result<(DomainStatus, Option<String>)> {
    let request = api(session, Method::Head, &format!("playlists/{}", playlist_id));

    let response = session.execute(request).await?;
    let status = status::classify(Outcome::Completed(response.status), RequestContext::General, None);
    if !status.is_success() {
        return Ok((status, None));
    }

    match utils::extract_etag(&response.header_bytes()) {
        Some(etag) => Ok((status, Some(etag))),
        None => {
            debug!(playlist_id, "no usable ETag header");
            Ok((DomainStatus::Unclassified, None))
        }
    }
}

/// Removes the entry at `index`.
pub async fn delete_playlist_item(
    session: &mut Session,
    playlist_id: &str,
    index: u64,
    etag: &str,
) -> Result<DomainStatus> {
    let (name, value) = utils::if_none_match(etag);
    let request = api(
        session,
        Method::Delete,
        &format!("playlists/{}/items/{}", playlist_id, index),
    )
    .header(&name, value);

    fetch::fetch_status(session, request, RequestContext::Index, playlist_id).await
}

/// Moves the entry at `index` to `to_index`.
pub async fn move_playlist_item(
    session: &mut Session,
    playlist_id: &str,
    index: u64,
    to_index: u64,
    etag: &str,
) -> Result<DomainStatus> {
    let (name, value) = utils::if_none_match(etag);
    let request = api(
        session,
        Method::Post,
        &format!("playlists/{}/items/{}", playlist_id, index),
    )
    .form("toIndex", to_index)
    .header(&name, value);

    fetch::fetch_status(session, request, RequestContext::Index, playlist_id).await
}

/// Appends tracks to a playlist.
pub async fn add_playlist_items(
    session: &mut Session,
    playlist_id: &str,
    track_ids: &[u64],
    on_duplicates: OnDuplicates,
    etag: &str,
) -> Result<DomainStatus> {
    let (name, value) = utils::if_none_match(etag);
    let request = api(session, Method::Post, &format!("playlists/{}/items", playlist_id))
        .form("trackIds", utils::join_ids(track_ids))
        .form("onDupes", on_duplicates.as_str())
        .form("onArtifactNotFound", "FAIL")
        .header(&name, value);

    fetch::fetch_status(session, request, RequestContext::Index, playlist_id).await
}
