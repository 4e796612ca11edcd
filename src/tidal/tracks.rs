use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api, paged},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Contributor, Credit, Item, Mix, Stream},
};

/// Retrieves one track from the catalogue.
///
/// # Arguments
///
/// * `session` - Session used for the request (demo sessions work)
/// * `track_id` - Catalogue id of the track
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The track as the single record of the item container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = tracks::get_track(&mut session, 77646168).await?;
/// if let Some(track) = content.items().first() {
///     println!("{} ({}s)", track.title, track.duration);
/// }
/// ```
pub async fn get_track(session: &mut Session, track_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("tracks/{}", track_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &track_id.to_string(),
        fetch::push_single::<Item>,
    )
    .await
}

/// Retrieves one page of the performers and writers of a track, one per role.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `track_id` - Catalogue id of the track
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
/// let content = tracks::get_track_contributors(&mut session, 77646168, 50, 0).await?;
/// ```
pub async fn get_track_contributors(
    session: &mut Session,
    track_id: u64,
    limit: u64,
    offset: u64,
) -> Result<ContentAggregate> {
    let request = paged(
        api(session, Method::Get, &format!("tracks/{}/contributors", track_id)),
        limit,
        offset,
    );

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &track_id.to_string(),
        |content, document| fetch::push_page::<Contributor>(content, document, "items", Nesting::Flat),
    )
    .await
}

/// Retrieves the credits of a track grouped by role.
///
/// The answer is a bare array rather than a page, so no paging fields are set.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `track_id` - Catalogue id of the track
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - One credit record per role in the credit container on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = tracks::get_track_credits(&mut session, 77646168).await?;
/// for credit in content.credits() {
///     println!("{}: {} contributor(s)", credit.role, credit.contributors.len());
/// }
/// ```
pub async fn get_track_credits(session: &mut Session, track_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("tracks/{}/credits", track_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &track_id.to_string(),
        |content, document| fetch::push_list::<Credit>(content, document, Nesting::Flat),
    )
    .await
}

/// Retrieves the radio mix generated from a track.
///
/// # Arguments
///
/// * `session` - Session used for the request
/// * `track_id` - Catalogue id of the track
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
/// let content = tracks::get_track_mix(&mut session, 77646168).await?;
/// ```
pub async fn get_track_mix(session: &mut Session, track_id: u64) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("tracks/{}/mix", track_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &track_id.to_string(),
        fetch::push_single::<Mix>,
    )
    .await
}

/// Retrieves the playback information of a track at the session's audio quality.
///
/// The base64 manifest is decoded. When it is a JSON document it supplies the
/// codec, the encryption type and the stream URLs, and the aggregate keeps it
/// as a second owned document next to the response. DASH manifests are XML
/// and only their MIME type is reported.
///
/// # Arguments
///
/// * `session` - Session with a user login; demo sessions cannot stream
/// * `track_id` - Catalogue id of the track
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The [`Stream`] in [`ContentAggregate::stream`] on success, or the domain status and
///   message of the failed call (e.g. [`DomainStatus::NotFound`](crate::tidal::DomainStatus::NotFound))
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// session.set_audio_quality(AudioQuality::Lossless);
/// let content = tracks::get_track_stream(&mut session, 77646168).await?;
/// if let Some(stream) = content.stream() {
///     for url in &stream.urls {
///         println!("{}", url);
///     }
/// }
/// ```
pub async fn get_track_stream(session: &mut Session, track_id: u64) -> Result<ContentAggregate> {
    let quality = session.credentials().audio_quality;
    let request = api(
        session,
        Method::Get,
        &format!("tracks/{}/playbackinfopostpaywall", track_id),
    )
    .query("audioquality", quality)
    .query("playbackmode", "STREAM")
    .query("assetpresentation", "FULL");

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &track_id.to_string(),
        |content, document| push_stream(content, document, track_id),
    )
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackInfo {
    #[serde(default)]
    track_id: Option<u64>,
    #[serde(default)]
    video_id: Option<u64>,
    #[serde(default)]
    audio_quality: Option<String>,
    #[serde(default)]
    video_quality: Option<String>,
    manifest_mime_type: String,
    manifest: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    codecs: Option<String>,
    #[serde(default)]
    encryption_type: Option<String>,
    #[serde(default)]
    urls: Vec<String>,
}

/// Decodes a playback-info document into a [`Stream`] and the manifest.
pub(crate) fn push_stream(content: &mut ContentAggregate, document: &Value, requested_id: u64) -> Result<()> {
    let info: PlaybackInfo = fetch::decode(document)?;

    let raw = STANDARD
        .decode(info.manifest.as_bytes())
        .map_err(|e| Error::Parse(format!("stream manifest: {}", e)))?;

    let mut stream = Stream {
        id: info.track_id.or(info.video_id).unwrap_or(requested_id),
        quality: info.audio_quality.or(info.video_quality).unwrap_or_default(),
        mime_type: info.manifest_mime_type,
        codec: None,
        encryption_type: None,
        urls: Vec::new(),
    };

    match serde_json::from_slice::<Value>(&raw) {
        Ok(manifest) => {
            let parsed: Manifest = fetch::decode(&manifest)?;
            stream.codec = parsed.codecs;
            stream.encryption_type = parsed.encryption_type;
            stream.urls = parsed.urls;
            content.attach_manifest(manifest);
        }
        Err(_) => {
            // DASH manifests are XML and are left to the player.
            debug!(mime_type = %stream.mime_type, "manifest is not a JSON document");
        }
    }

    content.set_stream(stream);
    Ok(())
}
