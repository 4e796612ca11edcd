//! Favorites of the logged-in user.
//!
//! A malformed add or delete answers [`DomainStatus::BadRequestFavorite`].

use std::{fmt, str::FromStr};

use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::{DomainStatus, RequestContext},
        transport::Method,
    },
    types::{Album, Artist, Item, Playlist},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteKind {
    Albums,
    Artists,
    Tracks,
    Videos,
    Playlists,
}

impl FavoriteKind {
    /// Path segment below `users/{id}/favorites/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Albums => "albums",
            FavoriteKind::Artists => "artists",
            FavoriteKind::Tracks => "tracks",
            FavoriteKind::Videos => "videos",
            FavoriteKind::Playlists => "playlists",
        }
    }

    /// Form field carrying the ids on add.
    fn id_field(&self) -> &'static str {
        match self {
            FavoriteKind::Albums => "albumIds",
            FavoriteKind::Artists => "artistIds",
            FavoriteKind::Tracks => "trackIds",
            FavoriteKind::Videos => "videoIds",
            FavoriteKind::Playlists => "uuids",
        }
    }
}

impl fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FavoriteKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "albums" | "album" => Ok(FavoriteKind::Albums),
            "artists" | "artist" => Ok(FavoriteKind::Artists),
            "tracks" | "track" => Ok(FavoriteKind::Tracks),
            "videos" | "video" => Ok(FavoriteKind::Videos),
            "playlists" | "playlist" => Ok(FavoriteKind::Playlists),
            other => Err(format!("unknown favorite kind: {}", other)),
        }
    }
}

/// Lists favorites of one kind, newest first.
pub async fn get_favorites(
    session: &mut Session,
    kind: FavoriteKind,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = paged(
        api(
            session,
            Method::Get,
            &format!("users/{}/favorites/{}", user_id, kind),
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
        move |content, document| match kind {
            FavoriteKind::Albums => fetch::push_page::<Album>(content, document, "items", Nesting::Under("item")),
            FavoriteKind::Artists => fetch::push_page::<Artist>(content, document, "items", Nesting::Under("item")),
            FavoriteKind::Tracks | FavoriteKind::Videos => {
                fetch::push_page::<Item>(content, document, "items", Nesting::Under("item"))
            }
            FavoriteKind::Playlists => {
                fetch::push_page::<Playlist>(content, document, "items", Nesting::Under("item"))
            }
        },
    )
    .await
}

/// Adds one or more ids of the same kind to the user's favorites.
pub async fn add_favorites(session: &mut Session, kind: FavoriteKind, ids: &[String]) -> Result<DomainStatus> {
    let user_id = session.user_id()?;
    let joined = ids.join(",");
    let request = api(
        session,
        Method::Post,
        &format!("users/{}/favorites/{}", user_id, kind),
    )
    .form(kind.id_field(), &joined)
    .form("onArtifactNotFound", "FAIL");

    fetch::fetch_status(session, request, RequestContext::Favorite, &joined).await
}

pub async fn delete_favorite(session: &mut Session, kind: FavoriteKind, id: &str) -> Result<DomainStatus> {
    let user_id = session.user_id()?;
    let request = api(
        session,
        Method::Delete,
        &format!("users/{}/favorites/{}/{}", user_id, kind, id),
    );

    fetch::fetch_status(session, request, RequestContext::Favorite, id).await
}
