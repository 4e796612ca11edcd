use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::RequestContext,
        tracks,
        transport::Method,
    },
    types::{Contributor, Item},
};

/// Retrieves one video from the catalogue.
///
/// # Arguments
///
/// * `session` - Session used for the request (demo sessions work)
/// * `video_id` - Catalogue id of the video
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The video as the single record of the item container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = videos::get_video(&mut session, 75623239).await?;
/// ```
pub async fn get_video(session: &mut Session, video_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("videos/{}", video_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &video_id.to_string(),
        fetch::push_single::<Item>,
    )
    .await
}

/// Retrieves one page of the contributors of a video.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `video_id` - Catalogue id of the video
/// * `limit` - Maximum number of contributors in this page
/// * `offset` - Index of the first contributor
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The contributors in the contributor container, with the paging
///   fields set, on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = videos::get_video_contributors(&mut session, 75623239, 50, 0).await?;
/// ```
pub async fn get_video_contributors(
    session: &mut Session,
    video_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    let request = paged(
        api(session, Method::Get, &format!("videos/{}/contributors", video_id)),
        limit,
        offset,
    );

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &video_id.to_string(),
        |content, document| fetch::push_page::<Contributor>(content, document, "items", Nesting::Flat),
    )
    .await
}

/// Retrieves the playback information of a video at the session's video quality.
///
/// The manifest is decoded the same way as for tracks.
///
/// # Arguments
///
/// * `session` - Session with a user login
/// * `video_id` - Catalogue id of the video
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The [`Stream`](crate::types::Stream) in [`ContentAggregate::stream`] on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = videos::get_video_stream(&mut session, 75623239).await?;
/// let urls = content.stream().map(|s| s.urls.clone()).unwrap_or_default();
/// ```
pub async fn get_video_stream(session: &mut Session, video_id: u64) -> Result<ContentAggregate> {
    let quality = session.credentials().video_quality;
    let request = api(
        session,
        Method::Get,
        &format!("videos/{}/playbackinfopostpaywall", video_id),
    )
    .query("videoquality", quality)
    .query("playbackmode", "STREAM")
    .query("assetpresentation", "FULL");

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &video_id.to_string(),
        |content, document| tracks::push_stream(content, document, video_id),
    )
    .await
}
