//! Core engine: runs the pipeline once per payload and assembles the summary.

use tracing::info;

use crate::aggregate;
use crate::config::Config;
use crate::era;
use crate::error::EngineError;
use crate::facts::{self, FactInputs};
use crate::genre;
use crate::mood;
use crate::normalize;
use crate::rank;
use crate::types::*;

/// The playlist analysis engine. Holds only configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Parse a JSON payload and analyze it.
  pub fn analyze_json(&self, raw: &str) -> Result<AnalysisSummary, EngineError> {
    let payload: CatalogPayload = serde_json::from_str(raw)?;
    Ok(self.analyze(&payload))
  }

  /// Analyze one payload. Never fails: malformed input degrades to sparse output.
  pub fn analyze(&self, payload: &CatalogPayload) -> AnalysisSummary {
    let catalog = normalize::normalize(payload);

    // Counts and rankings.
    let tallies = aggregate::tally_artists(&catalog);
    let stats = aggregate::compute_stats(&catalog, &tallies);
    let top_artists = rank::top_artists(&tallies, self.config.top_artists);
    let top_tracks = rank::top_tracks(&catalog.tracks, self.config.top_tracks);
    let eras = era::distribution(&catalog.tracks, self.config.max_eras);
    let top_genres = genre::rank_genres(&catalog.genres, self.config.top_genres);

    // Moods need at least one track; acoustic terms only when profiled.
    let genre_text = catalog.genre_text();
    let moods = if catalog.tracks.is_empty() {
      Vec::new()
    } else {
      let features = (stats.tracks_with_features > 0).then_some(&stats.audio_features);
      mood::score_moods(&genre_text, features, self.config.max_moods)
    };

    let facts = facts::generate(
      &FactInputs {
        genre_text: &genre_text,
        top_genres: &top_genres,
        eras: &eras,
        stats: &stats,
      },
      &self.config,
    );

    // Pass-through metadata.
    let playlist = playlist_meta(&payload.playlist, &catalog);

    info!(
      playlist = %playlist.name,
      tracks = stats.total_tracks,
      artists = stats.total_artists,
      with_features = stats.tracks_with_features,
      moods = moods.len(),
      facts = facts.len(),
      "analysis complete"
    );

    AnalysisSummary {
      playlist,
      stats,
      top_artists,
      top_tracks,
      top_genres,
      moods,
      eras,
      facts,
    }
  }
}

fn playlist_meta(raw: &RawPlaylist, catalog: &Catalog) -> PlaylistMeta {
  PlaylistMeta {
    id: raw.id.clone().unwrap_or_default(),
    name: raw.name.clone().unwrap_or_default(),
    description: raw.description.clone().unwrap_or_default(),
    owner: raw
      .owner
      .as_ref()
      .and_then(|o| o.display_name.clone().or_else(|| o.id.clone()))
      .unwrap_or_default(),
    followers: raw.followers.as_ref().map(|f| f.total).unwrap_or(0),
    image: first_image_url(&raw.images),
    declared_tracks: raw
      .tracks
      .total
      .unwrap_or(raw.tracks.items.len() as u64),
    fingerprint: fingerprint(&catalog.tracks),
  }
}

/// Stable id of the analyzed track sequence: blake3 over ordered ids, 16 hex chars.
pub fn fingerprint(tracks: &[Track]) -> String {
  let mut hasher = blake3::Hasher::new();
  for track in tracks {
    hasher.update(track.id.as_bytes());
    hasher.update(b"|");
  }
  let hex = hasher.finalize().to_hex();
  hex[..16].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn item(id: &str, artists: &[(&str, &str)], popularity: u8, release: &str) -> serde_json::Value {
    json!({
      "added_at": "2024-01-01T00:00:00Z",
      "track": {
        "id": id,
        "name": format!("Song {}", id),
        "duration_ms": 180000,
        "popularity": popularity,
        "explicit": false,
        "artists": artists.iter().map(|(id, name)| json!({"id": id, "name": name})).collect::<Vec<_>>(),
        "album": {"id": "al", "name": "Album", "images": [{"url": format!("https://img/{}", id)}], "release_date": release}
      }
    })
  }

  fn features(id: &str, energy: f64, tempo: f64) -> serde_json::Value {
    json!({
      "id": id, "danceability": 0.5, "energy": energy, "valence": 0.5, "acousticness": 0.3,
      "instrumentalness": 0.0, "speechiness": 0.05, "liveness": 0.1, "tempo": tempo
    })
  }

  fn payload(items: Vec<serde_json::Value>, audio: Vec<serde_json::Value>, artists: serde_json::Value) -> CatalogPayload {
    let total = items.len();
    serde_json::from_value(json!({
      "playlist": {
        "id": "pl1", "name": "Test Mix", "description": "d",
        "images": [{"url": "https://img/pl"}],
        "owner": {"id": "u1", "display_name": "Dana"},
        "followers": {"total": 12},
        "tracks": {"total": total, "items": items}
      },
      "audio_features": audio,
      "artists": artists
    }))
    .unwrap()
  }

  #[test]
  fn empty_payload_gives_zeroed_summary() {
    let summary = Engine::with_defaults().analyze(&CatalogPayload::default());
    assert_eq!(summary.stats.total_tracks, 0);
    assert_eq!(summary.stats.total_duration, "0m");
    assert!(summary.top_artists.is_empty());
    assert!(summary.top_tracks.is_empty());
    assert!(summary.moods.is_empty());
    assert!(summary.facts.is_empty());
    assert!(summary.eras.buckets.is_empty());
    assert_eq!(summary.playlist.fingerprint.len(), 16);
  }

  #[test]
  fn three_to_one_artist_ranking() {
    let p = payload(
      vec![
        item("t1", &[("a", "Ari")], 10, "2001"),
        item("t2", &[("b", "Bo")], 20, "2002"),
        item("t3", &[("a", "Ari")], 30, "2003"),
        item("t4", &[("a", "Ari")], 40, "2004"),
      ],
      vec![],
      json!([]),
    );
    let summary = Engine::with_defaults().analyze(&p);
    assert_eq!(summary.top_artists.len(), 2);
    assert_eq!(summary.top_artists[0].name, "Ari");
    assert_eq!(summary.top_artists[0].tracks, 3);
    assert_eq!(summary.top_artists[0].rank, 1);
    assert_eq!(summary.top_artists[1].name, "Bo");
    assert_eq!(summary.top_artists[1].tracks, 1);
    assert_eq!(summary.top_artists[1].rank, 2);
    assert_eq!(summary.stats.total_artists, 2);
  }

  #[test]
  fn lofi_collection_ranks_chill_high() {
    let p = payload(
      vec![
        item("t1", &[("a", "Ari")], 10, "2019"),
        item("t2", &[("b", "Bo")], 20, "2020"),
      ],
      vec![features("t1", 0.15, 80.0), features("t2", 0.25, 84.0)],
      json!([
        {"id": "a", "genres": ["lofi", "chill beats"]},
        {"id": "b", "genres": ["chill lofi"]}
      ]),
    );
    let summary = Engine::with_defaults().analyze(&p);
    let chill = summary.moods.iter().position(|m| m.name == "Chill").unwrap();
    assert!(chill <= 1);
    assert!(summary.moods[chill].value > 0);
  }

  #[test]
  fn playlist_metadata_passed_through() {
    let p = payload(vec![item("t1", &[("a", "Ari")], 10, "1994")], vec![], json!([]));
    let summary = Engine::with_defaults().analyze(&p);
    assert_eq!(summary.playlist.name, "Test Mix");
    assert_eq!(summary.playlist.owner, "Dana");
    assert_eq!(summary.playlist.followers, 12);
    assert_eq!(summary.playlist.image, "https://img/pl");
    assert_eq!(summary.playlist.declared_tracks, 1);
  }

  #[test]
  fn caps_come_from_config() {
    let items = (0..8u8)
      .map(|i| {
        let artist = format!("a{}", i);
        item(&format!("t{}", i), &[(artist.as_str(), "X")], i, "1990")
      })
      .collect();
    let engine = Engine::new(Config {
      top_artists: 3,
      top_tracks: 2,
      ..Config::default()
    });
    let summary = engine.analyze(&payload(items, vec![], json!([])));
    assert_eq!(summary.top_artists.len(), 3);
    assert_eq!(summary.top_tracks.len(), 2);
    assert_eq!(summary.top_tracks[0].id, "t7");
  }

  #[test]
  fn fingerprint_depends_on_track_order() {
    let a = payload(vec![item("t1", &[], 1, ""), item("t2", &[], 1, "")], vec![], json!([]));
    let b = payload(vec![item("t2", &[], 1, ""), item("t1", &[], 1, "")], vec![], json!([]));
    let engine = Engine::with_defaults();
    assert_ne!(engine.analyze(&a).playlist.fingerprint, engine.analyze(&b).playlist.fingerprint);
    assert_eq!(engine.analyze(&a).playlist.fingerprint, engine.analyze(&a).playlist.fingerprint);
  }

  #[test]
  fn analyze_json_rejects_non_json() {
    let err = Engine::with_defaults().analyze_json("not json").unwrap_err();
    assert!(matches!(err, EngineError::Json(_)));
  }
}
