use serde_json::Value;

use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Album, Artist, Item, Playlist},
};

/// Searches the catalogue.
///
/// The answer is composite: each populated kind gets its own container in
/// the same aggregate. Tracks and videos both land in the item container.
pub async fn search(session: &mut Session, term: &str, limit: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, "search")
        .query("query", term)
        .query("limit", limit)
        .query("types", "ARTISTS,ALBUMS,TRACKS,VIDEOS,PLAYLISTS");

    fetch::fetch(session, request, RequestContext::General, term, populate).await
}

fn populate(content: &mut ContentAggregate, document: &Value) -> Result<()> {
    if let Some(section) = document.get("artists") {
        fetch::push_list::<Artist>(content, &section["items"], Nesting::Flat)?;
    }
    if let Some(section) = document.get("albums") {
        fetch::push_list::<Album>(content, &section["items"], Nesting::Flat)?;
    }
    if let Some(section) = document.get("playlists") {
        fetch::push_list::<Playlist>(content, &section["items"], Nesting::Flat)?;
    }
    for key in ["tracks", "videos"] {
        if let Some(section) = document.get(key) {
            fetch::push_list::<Item>(content, &section["items"], Nesting::Flat)?;
        }
    }
    Ok(())
}
