use tabled::Table;

use crate::{
    cli::{PAGE_SIZE, check, open_session, spinner},
    error, info,
    management::ContentAggregate,
    tidal::{mixes, tracks, videos},
    types::{Item, ItemTableRow},
    utils, warning,
};

/// Shows a track, optionally with its contributors and credits.
pub async fn track(track_id: u64, contributors: bool, credits: bool, demo: bool) {
    let mut session = open_session(demo).await;

    let content = match tracks::get_track(&mut session, track_id).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load track {}. Err: {}", track_id, e),
    };
    if !check(&content) {
        return;
    }
    print_items(content.items());

    if let Some(item) = content.items().first() {
        if let Some(album) = &item.album {
            info!("Album: {} ({})", album.title, album.id);
        }
    }

    if contributors {
        match tracks::get_track_contributors(&mut session, track_id, PAGE_SIZE, 0).await {
            Ok(c) if check(&c) => {
                for contributor in c.contributors() {
                    info!(
                        "{}: {}",
                        contributor.role.as_deref().unwrap_or("Contributor"),
                        contributor.name
                    );
                }
            }
            Ok(_) => {}
            Err(e) => warning!("Cannot load contributors. Err: {}", e),
        }
    }

    if credits {
        match tracks::get_track_credits(&mut session, track_id).await {
            Ok(c) if check(&c) => {
                for credit in c.credits() {
                    let names = credit
                        .contributors
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    info!("{}: {}", credit.role, names);
                }
            }
            Ok(_) => {}
            Err(e) => warning!("Cannot load credits. Err: {}", e),
        }
    }
}

/// Prints the stream URLs of a track or video.
pub async fn stream(id: u64, video: bool) {
    let mut session = open_session(false).await;

    let pb = spinner("Requesting playback information...");
    let result = if video {
        videos::get_video_stream(&mut session, id).await
    } else {
        tracks::get_track_stream(&mut session, id).await
    };
    pb.finish_and_clear();

    let content: ContentAggregate = match result {
        Ok(c) => c,
        Err(e) => error!("Cannot load stream for {}. Err: {}", id, e),
    };
    if !check(&content) {
        return;
    }

    let Some(stream) = content.stream() else {
        warning!("No playback information returned.");
        return;
    };

    info!("Quality:  {}", stream.quality);
    info!("Manifest: {}", stream.mime_type);
    if let Some(codec) = &stream.codec {
        info!("Codec:    {}", codec);
    }
    if stream.urls.is_empty() {
        warning!("The manifest carries no direct URLs.");
    }
    for url in &stream.urls {
        println!("{}", url);
    }
}

pub async fn mix(mix_id: Option<String>, demo: bool) {
    let mut session = open_session(demo).await;

    let Some(mix_id) = mix_id else {
        match mixes::get_user_mixes(&mut session).await {
            Ok(c) if check(&c) => {
                for mix in c.mixes() {
                    info!("{}  {}", mix.id, mix.title.as_deref().unwrap_or("-"));
                }
            }
            Ok(_) => {}
            Err(e) => error!("Cannot load your mixes. Err: {}", e),
        }
        return;
    };

    match mixes::get_mix_items(&mut session, &mix_id).await {
        Ok(c) if check(&c) => print_items(c.items()),
        Ok(_) => {}
        Err(e) => error!("Cannot load mix {}. Err: {}", mix_id, e),
    }
}

pub(crate) fn print_items(items: &[Item]) {
    let rows: Vec<ItemTableRow> = items
        .iter()
        .map(|i| ItemTableRow {
            id: i.id,
            title: match &i.version {
                Some(version) => format!("{} ({})", i.title, version),
                None => i.title.clone(),
            },
            artists: utils::join_artist_names(&i.artists),
            duration: utils::format_duration(i.duration),
        })
        .collect();

    println!("{}", Table::new(rows));
}
