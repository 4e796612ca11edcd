use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Album, Item},
};

/// Retrieves one album from the catalogue.
///
/// # Arguments
///
/// * `session` - Session used for the request (demo sessions work)
/// * `album_id` - Catalogue id of the album
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The album as the single record of the album container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = albums::get_album(&mut session, 17927863).await?;
/// if content.is_success() {
///     println!("{}", content.albums()[0].title);
/// }
/// ```
pub async fn get_album(session: &mut Session, album_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("albums/{}", album_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &album_id.to_string(),
        fetch::push_single::<Album>,
    )
    .await
}

/// Retrieves one page of the tracks and videos of an album.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `album_id` - Catalogue id of the album
/// * `limit` - Maximum number of entries in this page
/// * `offset` - Index of the first entry
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The entries in the item container, with `limit`, `offset` and
///   `total_number_of_items` set from the page, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let mut offset = 0;
/// loop {
///     let page = albums::get_album_items(&mut session, 17927863, 50, offset).await?;
///     offset += page.items().len() as u64;
///     if page.items().is_empty() || offset >= page.total_number_of_items.unwrap_or(0) {
///         break;
///     }
/// }
/// ```
pub async fn get_album_items(
    session: &mut Session,
    album_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    let request = paged(
        api(session, Method::Get, &format!("albums/{}/items", album_id)),
        limit,
        offset,
    );

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &album_id.to_string(),
        |content, document| fetch::push_page::<Item>(content, document, "items", Nesting::Under("item")),
    )
    .await
}
