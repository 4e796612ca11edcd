use chrono::Utc;

use crate::types::ArtistRef;

/// Longest ETag value accepted from a response header, in bytes.
pub const MAX_ETAG_LEN: usize = 256;

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Extracts the `ETag` value from a raw header block.
///
/// Header names are matched case-insensitively, surrounding quotes and a
/// weak-validator prefix are stripped. Values longer than [`MAX_ETAG_LEN`]
/// are rejected. The header block itself may be of any length.
pub fn extract_etag(header_block: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(header_block);

    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("etag"))
        .map(|(_, value)| {
            let value = value.trim();
            let value = value.strip_prefix("W/").unwrap_or(value);
            value.trim_matches('"').to_string()
        })
        .filter(|value| !value.is_empty() && value.len() <= MAX_ETAG_LEN)
}

pub fn if_none_match(etag: &str) -> (String, String) {
    ("if-none-match".to_string(), etag.to_string())
}

/// Joins ids with commas for form bodies like `trackIds=1,2,3`.
pub fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn join_artist_names(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats seconds as `m:ss` or `h:mm:ss`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
