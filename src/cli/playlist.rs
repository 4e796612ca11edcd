use crate::{
    cli::{PAGE_SIZE, check, open_session, report_status, search::print_playlists, tracks::print_items},
    error, info,
    tidal::{OnDuplicates, Session, playlists},
    success,
};

/// Shows a playlist's entries, or the user's playlists without a uuid.
pub async fn playlist(uuid: Option<String>, demo: bool) {
    let mut session = open_session(demo && uuid.is_some()).await;

    let Some(uuid) = uuid else {
        match playlists::get_user_playlists(&mut session, PAGE_SIZE, 0).await {
            Ok(c) if check(&c) => print_playlists(c.playlists()),
            Ok(_) => {}
            Err(e) => error!("Cannot load your playlists. Err: {}", e),
        }
        return;
    };

    let content = match playlists::get_playlist(&mut session, &uuid).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load playlist {}. Err: {}", uuid, e),
    };
    if !check(&content) {
        return;
    }
    print_playlists(content.playlists());

    let mut offset = 0;
    loop {
        let page = match playlists::get_playlist_items(&mut session, &uuid, PAGE_SIZE, offset).await {
            Ok(c) => c,
            Err(e) => error!("Cannot load items of playlist {}. Err: {}", uuid, e),
        };
        if !check(&page) || page.items().is_empty() {
            break;
        }
        print_items(page.items());

        offset += page.items().len() as u64;
        if offset >= page.total_number_of_items.unwrap_or(0) {
            break;
        }
    }
}

pub async fn playlist_create(title: String, description: String) {
    let mut session = open_session(false).await;

    match playlists::create_playlist(&mut session, &title, &description).await {
        Ok(c) if check(&c) => {
            if let Some(p) = c.playlists().first() {
                success!("Created playlist {} ({}).", p.title, p.uuid);
            }
        }
        Ok(_) => {}
        Err(e) => error!("Cannot create playlist. Err: {}", e),
    }
}

pub async fn playlist_delete(uuid: String) {
    let mut session = open_session(false).await;

    match playlists::delete_playlist(&mut session, &uuid).await {
        Ok(status) => report_status(&format!("Deleting playlist {}", uuid), status),
        Err(e) => error!("Cannot delete playlist {}. Err: {}", uuid, e),
    }
}

pub async fn playlist_add(uuid: String, track_ids: Vec<u64>, allow_duplicates: bool) {
    let mut session = open_session(false).await;
    let etag = current_etag(&mut session, &uuid).await;

    let on_duplicates = if allow_duplicates {
        OnDuplicates::Add
    } else {
        OnDuplicates::Fail
    };

    match playlists::add_playlist_items(&mut session, &uuid, &track_ids, on_duplicates, &etag).await {
        Ok(status) => report_status(&format!("Adding {} track(s)", track_ids.len()), status),
        Err(e) => error!("Cannot add tracks to playlist {}. Err: {}", uuid, e),
    }
}

pub async fn playlist_remove(uuid: String, index: u64) {
    let mut session = open_session(false).await;
    let etag = current_etag(&mut session, &uuid).await;

    match playlists::delete_playlist_item(&mut session, &uuid, index, &etag).await {
        Ok(status) => report_status(&format!("Removing entry {}", index), status),
        Err(e) => error!("Cannot edit playlist {}. Err: {}", uuid, e),
    }
}

pub async fn playlist_move(uuid: String, index: u64, to_index: u64) {
    let mut session = open_session(false).await;
    let etag = current_etag(&mut session, &uuid).await;

    match playlists::move_playlist_item(&mut session, &uuid, index, to_index, &etag).await {
        Ok(status) => report_status(&format!("Moving entry {} to {}", index, to_index), status),
        Err(e) => error!("Cannot edit playlist {}. Err: {}", uuid, e),
    }
}

async fn current_etag(session: &mut Session, uuid: &str) -> String {
    match playlists::get_playlist_etag(session, uuid).await {
        Ok((_, Some(etag))) => {
            info!("Playlist version {}", etag);
            etag
        }
        Ok((status, None)) => error!("Cannot read the version of playlist {}: {}", uuid, status),
        Err(e) => error!("Cannot read the version of playlist {}. Err: {}", uuid, e),
    }
}
