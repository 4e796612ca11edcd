use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Album, Artist, Item, Link, Mix},
};

/// Retrieves one artist from the catalogue.
///
/// # Arguments
///
/// * `session` - Session used for the request (demo sessions work)
/// * `artist_id` - Catalogue id of the artist
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The artist as the single record of the artist container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist(&mut session, 3565).await?;
/// let name = content.artists().first().map(|a| a.name.as_str());
/// ```
pub async fn get_artist(session: &mut Session, artist_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("artists/{}", artist_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &artist_id.to_string(),
        fetch::push_single::<Artist>,
    )
    .await
}

/// Retrieves one page of the albums released by an artist.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `artist_id` - Catalogue id of the artist
/// * `limit` - Maximum number of albums in this page
/// * `offset` - Index of the first album
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The albums in the album container, with the paging fields set, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist_albums(&mut session, 3565, 50, 0).await?;
/// for album in content.albums() {
///     println!("{}", album.title);
/// }
/// ```
pub async fn get_artist_albums(
    session: &mut Session,
    artist_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    list(session, artist_id, "albums", limit, offset, |content, document| {
        fetch::push_page::<Album>(content, document, "items", Nesting::Flat)
    })
    .await
}

/// Retrieves one page of an artist's most popular tracks.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `artist_id` - Catalogue id of the artist
/// * `limit` - Maximum number of tracks in this page
/// * `offset` - Index of the first track
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The tracks in the item container, with the paging fields set, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist_top_tracks(&mut session, 3565, 10, 0).await?;
/// ```
pub async fn get_artist_top_tracks(
    session: &mut Session,
    artist_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    list(session, artist_id, "toptracks", limit, offset, |content, document| {
        fetch::push_page::<Item>(content, document, "items", Nesting::Flat)
    })
    .await
}

/// Retrieves one page of an artist's videos.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `artist_id` - Catalogue id of the artist
/// * `limit` - Maximum number of videos in this page
/// * `offset` - Index of the first video
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The videos in the item container, with the paging fields set, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist_videos(&mut session, 3565, 10, 0).await?;
/// let videos = content.items().iter().filter(|i| i.is_video()).count();
/// ```
pub async fn get_artist_videos(
    session: &mut Session,
    artist_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    list(session, artist_id, "videos", limit, offset, |content, document| {
        fetch::push_page::<Item>(content, document, "items", Nesting::Flat)
    })
    .await
}

/// Retrieves the radio mix generated from an artist.
///
/// Only the mix record is returned; its entries come from
/// [`mixes::get_mix_items`](crate::tidal::mixes::get_mix_items).
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `artist_id` - Catalogue id of the artist
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The mix as the single record of the mix container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist_mix(&mut session, 3565).await?;
/// if let Some(mix) = content.mixes().first() {
///     let items = mixes::get_mix_items(&mut session, &mix.id).await?;
/// }
/// ```
pub async fn get_artist_mix(session: &mut Session, artist_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("artists/{}/mix", artist_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &artist_id.to_string(),
        fetch::push_single::<Mix>,
    )
    .await
}

/// Retrieves the external links of an artist (homepage, social media).
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `artist_id` - Catalogue id of the artist
/// * `limit` - Maximum number of links in this page
/// * `offset` - Index of the first link
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The links in the link container, with the paging fields set, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = artists::get_artist_links(&mut session, 3565, 10, 0).await?;
/// for link in content.links() {
///     println!("{}", link.url);
/// }
/// ```
pub async fn get_artist_links(
    session: &mut Session,
    artist_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    list(session, artist_id, "links", limit, offset, |content, document| {
        fetch::push_page::<Link>(content, document, "items", Nesting::Flat)
    })
    .await
}

async fn list<F>(
    session: &mut Session,
    artist_id: u64,
    resource: &str,
    limit: u64,
    offset: u64,
    populate: F,
) -> Result<ContentAggregate>
where
    F: FnOnce(&mut ContentAggregate, &serde_json::Value) -> Result<()>,
{
    let request = paged(
        api(session, Method::Get, &format!("artists/{}/{}", artist_id, resource)),
        limit,
        offset,
    );
    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &artist_id.to_string(),
        populate,
    )
    .await
}
