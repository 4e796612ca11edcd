use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry as a UNIX timestamp in seconds.
    pub expires_at: i64,
}

impl Token {
    /// Builds a token from an exchange answer. Negative lifetimes count as zero.
    pub fn issued(access_token: String, refresh_token: String, issued_at: i64, expires_in: i64) -> Self {
        Token {
            access_token,
            refresh_token,
            expires_at: issued_at.saturating_add(expires_in.max(0)),
        }
    }

    pub fn is_expired_at(&self, now: i64, margin_secs: i64) -> bool {
        now.saturating_add(margin_secs) >= self.expires_at
    }
}

/// Device-code / user-code pair issued by the authorization server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    #[serde(default = "default_poll_interval")]
    pub interval: u64,
}

fn default_poll_interval() -> u64 {
    2
}

impl LoginCode {
    /// URL the user should open, with the scheme the server sometimes omits.
    pub fn link(&self) -> String {
        let uri = self
            .verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri);
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("https://{}", uri)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioQuality {
    Low,
    #[default]
    High,
    Lossless,
    HiRes,
}

impl AudioQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioQuality::Low => "LOW",
            AudioQuality::High => "HIGH",
            AudioQuality::Lossless => "LOSSLESS",
            AudioQuality::HiRes => "HI_RES",
        }
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(AudioQuality::Low),
            "HIGH" => Ok(AudioQuality::High),
            "LOSSLESS" => Ok(AudioQuality::Lossless),
            "HI_RES" | "HIRES" => Ok(AudioQuality::HiRes),
            other => Err(format!("unknown audio quality: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoQuality {
    AudioOnly,
    Low,
    Medium,
    #[default]
    High,
}

impl VideoQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::AudioOnly => "AUDIO_ONLY",
            VideoQuality::Low => "LOW",
            VideoQuality::Medium => "MEDIUM",
            VideoQuality::High => "HIGH",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUDIO_ONLY" => Ok(VideoQuality::AudioOnly),
            "LOW" => Ok(VideoQuality::Low),
            "MEDIUM" => Ok(VideoQuality::Medium),
            "HIGH" => Ok(VideoQuality::High),
            other => Err(format!("unknown video quality: {}", other)),
        }
    }
}

/// Contributing artist attached to albums, tracks and videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub number_of_tracks: u64,
    #[serde(default)]
    pub number_of_videos: u64,
    #[serde(default)]
    pub number_of_volumes: u64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub audio_quality: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub video_cover: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// A track or a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub track_number: u64,
    #[serde(default)]
    pub volume_number: u64,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub replay_gain: Option<f64>,
    #[serde(default)]
    pub peak: Option<f64>,
    #[serde(default)]
    pub audio_quality: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub allow_streaming: bool,
    #[serde(default)]
    pub stream_ready: bool,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// Absent for videos.
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

impl Item {
    pub fn is_video(&self) -> bool {
        self.album.is_none() && self.image_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub popularity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_tracks: u64,
    #[serde(default)]
    pub number_of_videos: u64,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub square_image: Option<String>,
    #[serde(default, rename = "type")]
    pub playlist_type: Option<String>,
    #[serde(default)]
    pub public_playlist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mix {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub mix_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditContributor {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
}

/// All contributors credited under one role, e.g. "Producer".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    #[serde(rename = "type")]
    pub role: String,
    #[serde(default)]
    pub contributors: Vec<CreditContributor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub site_name: Option<String>,
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Subscription of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default, rename = "subscription")]
    pub plan: Option<SubscriptionPlan>,
    /// Best audio quality the plan can stream, e.g. `LOSSLESS`.
    #[serde(default)]
    pub highest_sound_quality: Option<String>,
    #[serde(default)]
    pub premium_access: bool,
    #[serde(default)]
    pub can_get_trial: bool,
    #[serde(default)]
    pub payment_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub offline_grace_period: Option<u64>,
}

/// Playback information for a track or video, with the decoded manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: u64,
    pub quality: String,
    pub mime_type: String,
    pub codec: Option<String>,
    pub encryption_type: Option<String>,
    pub urls: Vec<String>,
}

#[derive(Tabled)]
pub struct ItemTableRow {
    pub id: u64,
    pub title: String,
    pub artists: String,
    pub duration: String,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub id: u64,
    pub title: String,
    pub artists: String,
    pub released: String,
    pub tracks: u64,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub id: u64,
    pub name: String,
    pub popularity: u64,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub uuid: String,
    pub title: String,
    pub tracks: u64,
    pub videos: u64,
}
