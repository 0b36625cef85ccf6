use tabled::Table;

use crate::{
    error,
    service::WordCounter,
    types::{Album, AlbumTableRow},
    warning,
};

pub async fn albums(counter: &WordCounter, artist: String) {
    let pb = super::spinner(&format!("Looking up albums of {}...", artist.trim()));
    let result = counter.albums_for_artist(&artist).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) => println!("{}", album_table(albums)),
        Err(e) if e.is_no_data() => {
            tracing::debug!(error = %e, "album lookup returned no data");
            warning!("No albums found for '{}'.", artist.trim());
        }
        Err(e) => error!("Cannot list albums. Err: {}", e),
    }
}

pub(crate) fn album_table(albums: Vec<Album>) -> Table {
    let rows: Vec<AlbumTableRow> = albums
        .into_iter()
        .map(|a| AlbumTableRow {
            name: a.name,
            id: a.id,
            released: a.release_date.unwrap_or_default(),
        })
        .collect();
    Table::new(rows)
}
