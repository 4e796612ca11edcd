use tabled::Table;

use crate::{
    cli::{albums::print_albums, artists::print_artists, check, open_session, spinner, tracks::print_items},
    error, info,
    management::ContentKind,
    tidal::search,
    types::{Playlist, PlaylistTableRow},
};

/// Searches the catalogue and prints one table per kind found.
pub async fn search(term: String, limit: u64, demo: bool) {
    let mut session = open_session(demo).await;

    let pb = spinner("Searching...");
    let result = search::search(&mut session, &term, limit).await;
    pb.finish_and_clear();

    let content = match result {
        Ok(c) => c,
        Err(e) => error!("Search failed. Err: {}", e),
    };
    if !check(&content) {
        return;
    }

    for kind in content.kinds() {
        info!("{}", kind);
        match kind {
            ContentKind::Artist => print_artists(content.artists()),
            ContentKind::Album => print_albums(content.albums()),
            ContentKind::Item => print_items(content.items()),
            ContentKind::Playlist => print_playlists(content.playlists()),
            _ => {}
        }
    }
}

pub(crate) fn print_playlists(playlists: &[Playlist]) {
    let rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .map(|p| PlaylistTableRow {
            uuid: p.uuid.clone(),
            title: p.title.clone(),
            tracks: p.number_of_tracks,
            videos: p.number_of_videos,
        })
        .collect();

    println!("{}", Table::new(rows));
}
