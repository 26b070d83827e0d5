//! Core types for the analysis engine (JSON contracts + internal models).

use std::collections::HashMap;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the catalog fetcher sends)
// ---------------------------------------------------------------------------

/// One analysis request. Unknown fields are silently ignored; elements with a
/// mismatched shape decode to `None` instead of failing the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPayload {
  #[serde(default, deserialize_with = "lenient_or_default")]
  pub playlist: RawPlaylist,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub audio_features: Vec<Option<RawAudioFeatures>>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub artists: Vec<Option<RawArtistDetail>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlaylist {
  #[serde(default, deserialize_with = "lenient")]
  pub id: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub images: Vec<Option<RawImage>>,
  #[serde(default, deserialize_with = "lenient")]
  pub owner: Option<RawOwner>,
  #[serde(default, deserialize_with = "lenient")]
  pub followers: Option<RawFollowers>,
  #[serde(default, deserialize_with = "lenient_or_default")]
  pub tracks: RawTrackPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOwner {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFollowers {
  #[serde(default)]
  pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrackPage {
  /// Size reported by the catalog; may differ from the number of usable items.
  #[serde(default, deserialize_with = "lenient")]
  pub total: Option<u64>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub items: Vec<Option<RawItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
  #[serde(default)]
  pub added_at: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub track: Option<RawTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub duration_ms: Option<u64>,
  /// Read as a number so `73.0` is accepted alongside `73`.
  #[serde(default, deserialize_with = "lenient")]
  pub popularity: Option<f64>,
  #[serde(default, deserialize_with = "lenient")]
  pub explicit: Option<bool>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub artists: Vec<Option<RawArtistRef>>,
  #[serde(default, deserialize_with = "lenient")]
  pub album: Option<RawAlbum>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtistRef {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlbum {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub images: Vec<Option<RawImage>>,
  #[serde(default)]
  pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
  #[serde(default)]
  pub url: Option<String>,
}

/// Per-track measurements as delivered by the audio-features service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAudioFeatures {
  #[serde(default)]
  pub id: Option<String>,
  pub danceability: Option<f64>,
  pub energy: Option<f64>,
  pub valence: Option<f64>,
  pub acousticness: Option<f64>,
  pub instrumentalness: Option<f64>,
  pub speechiness: Option<f64>,
  pub liveness: Option<f64>,
  pub tempo: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtistDetail {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub images: Vec<Option<RawImage>>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub genres: Vec<Option<String>>,
}

/// Decode any JSON value into `T`, mapping a shape mismatch to `None`.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = serde_json::Value::deserialize(d)?;
  Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned + Default,
{
  Ok(lenient(d)?.unwrap_or_default())
}

/// Decode a JSON array element by element; a non-array decodes as empty.
fn lenient_seq<'de, D, T>(d: D) -> Result<Vec<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  match serde_json::Value::deserialize(d)? {
    serde_json::Value::Array(values) => Ok(
      values
        .into_iter()
        .map(|v| serde_json::from_value(v).ok())
        .collect(),
    ),
    _ => Ok(Vec::new()),
  }
}

/// First usable image URL, empty when none.
pub(crate) fn first_image_url(images: &[Option<RawImage>]) -> String {
  images
    .iter()
    .flatten()
    .filter_map(|img| img.url.as_deref())
    .map(str::trim)
    .find(|url| !url.is_empty())
    .unwrap_or_default()
    .to_string()
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Validated acoustic measurements; unit features in [0,1], tempo in BPM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticProfile {
  pub danceability: f64,
  pub energy: f64,
  pub valence: f64,
  pub acousticness: f64,
  pub instrumentalness: f64,
  pub speechiness: f64,
  pub liveness: f64,
  pub tempo: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtistRef {
  pub id: String,
  pub name: String,
}

/// Release era of a track: a parsed year or the dedicated unknown bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
  Year(i32),
  Unknown,
}

impl Era {
  /// `floor(year / 10) * 10`, or `None` for the unknown bucket.
  pub fn decade(self) -> Option<i32> {
    match self {
      Era::Year(y) => Some(y.div_euclid(10) * 10),
      Era::Unknown => None,
    }
  }
}

/// Canonical track after normalization + validation.
#[derive(Debug, Clone)]
pub struct Track {
  pub id: String,
  pub name: String,
  pub duration_ms: u64,
  pub popularity: u8,
  pub explicit: bool,
  pub artists: Vec<ArtistRef>,
  pub era: Era,
  pub album_art: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArtistDetail {
  pub image: String,
  pub genres: Vec<String>,
}

/// Everything downstream stages read; built once by the normalizer.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  /// Valid tracks in payload order.
  pub tracks: Vec<Track>,
  /// Distinct artists appearing on valid tracks, first-seen order.
  pub artists: Vec<ArtistRef>,
  /// Track id → acoustic profile.
  pub profiles: HashMap<String, AcousticProfile>,
  /// Artist id → image + genre tags.
  pub details: HashMap<String, ArtistDetail>,
  /// Genre tags of `artists`, in artist order.
  pub genres: Vec<String>,
}

impl Catalog {
  pub fn profile(&self, track_id: &str) -> Option<&AcousticProfile> {
    self.profiles.get(track_id)
  }

  pub fn artist_image(&self, artist_id: &str) -> Option<&str> {
    self
      .details
      .get(artist_id)
      .map(|d| d.image.as_str())
      .filter(|img| !img.is_empty())
  }

  /// Lowercased genre tags joined by spaces; the haystack for keyword scans.
  pub fn genre_text(&self) -> String {
    self.genres.join(" ").to_lowercase()
  }
}

/// Per-artist appearance count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistTally {
  pub id: String,
  pub name: String,
  pub count: usize,
  pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMeta {
  pub id: String,
  pub name: String,
  pub description: String,
  pub owner: String,
  pub followers: u64,
  pub image: String,
  /// Track total claimed by the catalog, before malformed entries are dropped.
  pub declared_tracks: u64,
  /// blake3 over the ordered valid track ids (16 hex chars).
  pub fingerprint: String,
}

/// Mean acoustic measurements over tracks that have a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAverages {
  pub danceability: f64,
  pub energy: f64,
  pub valence: f64,
  pub acousticness: f64,
  pub instrumentalness: f64,
  pub speechiness: f64,
  pub liveness: f64,
  pub tempo: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub total_tracks: usize,
  pub total_duration_ms: u64,
  pub total_duration: String,
  pub total_artists: usize,
  pub avg_popularity: u8,
  pub avg_tempo: u32,
  pub explicit_percentage: u8,
  pub tracks_with_features: usize,
  pub audio_features: FeatureAverages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedArtist {
  pub rank: usize,
  pub id: String,
  pub name: String,
  pub tracks: usize,
  pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTrack {
  pub rank: usize,
  pub id: String,
  pub name: String,
  pub artist: String,
  pub album_art: String,
  pub popularity: u8,
  /// Placeholder: popularity × 1,000,000. Not a measured play count.
  pub approx_plays: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
  pub name: String,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mood {
  pub name: String,
  pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraBucket {
  /// Display label, e.g. "1990s".
  pub name: String,
  pub decade: i32,
  pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EraDistribution {
  pub buckets: Vec<EraBucket>,
  /// Tracks in decades cut by the bucket cap.
  pub other: usize,
  /// Tracks without a parseable release year.
  pub unknown: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
  pub playlist: PlaylistMeta,
  pub stats: Stats,
  pub top_artists: Vec<RankedArtist>,
  pub top_tracks: Vec<RankedTrack>,
  pub top_genres: Vec<GenreCount>,
  pub moods: Vec<Mood>,
  pub eras: EraDistribution,
  pub facts: Vec<String>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Summary plus the caller-side generation timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampedSummary<'a> {
  #[serde(flatten)]
  pub summary: &'a AnalysisSummary,
  pub generated_at: String,
}
