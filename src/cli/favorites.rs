use crate::{
    cli::{
        PAGE_SIZE, albums::print_albums, artists::print_artists, check, open_session, report_status,
        search::print_playlists, tracks::print_items,
    },
    error,
    tidal::{FavoriteKind, favorites},
};

/// Lists favorites of one kind, or adds / removes one.
pub async fn favorites(kind: FavoriteKind, add: Vec<String>, remove: Option<String>) {
    let mut session = open_session(false).await;

    if !add.is_empty() {
        match favorites::add_favorites(&mut session, kind, &add).await {
            Ok(status) => report_status(&format!("Adding {} favorite {}", add.len(), kind), status),
            Err(e) => error!("Cannot add favorites. Err: {}", e),
        }
        return;
    }

    if let Some(id) = remove {
        match favorites::delete_favorite(&mut session, kind, &id).await {
            Ok(status) => report_status(&format!("Removing favorite {}", id), status),
            Err(e) => error!("Cannot remove favorite {}. Err: {}", id, e),
        }
        return;
    }

    let content = match favorites::get_favorites(&mut session, kind, PAGE_SIZE, 0).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load favorite {}. Err: {}", kind, e),
    };
    if !check(&content) {
        return;
    }

    match kind {
        FavoriteKind::Albums => print_albums(content.albums()),
        FavoriteKind::Artists => print_artists(content.artists()),
        FavoriteKind::Tracks | FavoriteKind::Videos => print_items(content.items()),
        FavoriteKind::Playlists => print_playlists(content.playlists()),
    }
}
