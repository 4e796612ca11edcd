use tabled::Table;

use crate::{
    cli::{PAGE_SIZE, check, open_session, tracks::print_items},
    error, info,
    tidal::albums,
    types::{Album, AlbumTableRow},
    utils,
};

/// Shows an album followed by its tracks and videos.
pub async fn album(album_id: u64, demo: bool) {
    let mut session = open_session(demo).await;

    let content = match albums::get_album(&mut session, album_id).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load album {}. Err: {}", album_id, e),
    };
    if !check(&content) {
        return;
    }
    print_albums(content.albums());

    if let Some(album) = content.albums().first() {
        if let Some(copyright) = &album.copyright {
            info!("{}", copyright);
        }
    }

    let mut offset = 0;
    loop {
        let page = match albums::get_album_items(&mut session, album_id, PAGE_SIZE, offset).await {
            Ok(c) => c,
            Err(e) => error!("Cannot load items of album {}. Err: {}", album_id, e),
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

pub(crate) fn print_albums(albums: &[Album]) {
    let rows: Vec<AlbumTableRow> = albums
        .iter()
        .map(|a| AlbumTableRow {
            id: a.id,
            title: a.title.clone(),
            artists: utils::join_artist_names(&a.artists),
            released: a.release_date.clone().unwrap_or_default(),
            tracks: a.number_of_tracks,
        })
        .collect();

    println!("{}", Table::new(rows));
}
