use clap::ValueEnum;
use tabled::Table;

use crate::{
    cli::{PAGE_SIZE, albums::print_albums, check, open_session, tracks::print_items},
    error, info,
    tidal::artists,
    types::{Artist, ArtistTableRow},
};

/// Which listing to show below the artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ArtistView {
    #[default]
    Top,
    Albums,
    Videos,
    Links,
    Mix,
}

pub async fn artist(artist_id: u64, view: ArtistView, demo: bool) {
    let mut session = open_session(demo).await;

    let content = match artists::get_artist(&mut session, artist_id).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load artist {}. Err: {}", artist_id, e),
    };
    if !check(&content) {
        return;
    }
    print_artists(content.artists());

    let listing = match view {
        ArtistView::Top => artists::get_artist_top_tracks(&mut session, artist_id, PAGE_SIZE, 0).await,
        ArtistView::Albums => artists::get_artist_albums(&mut session, artist_id, PAGE_SIZE, 0).await,
        ArtistView::Videos => artists::get_artist_videos(&mut session, artist_id, PAGE_SIZE, 0).await,
        ArtistView::Links => artists::get_artist_links(&mut session, artist_id, PAGE_SIZE, 0).await,
        ArtistView::Mix => artists::get_artist_mix(&mut session, artist_id).await,
    };

    let listing = match listing {
        Ok(c) => c,
        Err(e) => error!("Cannot load artist {}. Err: {}", artist_id, e),
    };
    if !check(&listing) {
        return;
    }

    match view {
        ArtistView::Top | ArtistView::Videos => print_items(listing.items()),
        ArtistView::Albums => print_albums(listing.albums()),
        ArtistView::Links => {
            for link in listing.links() {
                info!("{}: {}", link.site_name.as_deref().unwrap_or("Link"), link.url);
            }
        }
        ArtistView::Mix => {
            for mix in listing.mixes() {
                info!("Mix {}", mix.id);
            }
        }
    }
}

pub(crate) fn print_artists(artists: &[Artist]) {
    let rows: Vec<ArtistTableRow> = artists
        .iter()
        .map(|a| ArtistTableRow {
            id: a.id,
            name: a.name.clone(),
            popularity: a.popularity,
        })
        .collect();

    println!("{}", Table::new(rows));
}
