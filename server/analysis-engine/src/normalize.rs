//! Normalize a raw catalog payload into the canonical internal Catalog.
//!
//! Malformed entries are skipped, never fatal.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::types::*;

/// Flatten the payload into validated tracks plus artist/profile lookups.
pub fn normalize(payload: &CatalogPayload) -> Catalog {
  let mut tracks = Vec::new();
  let mut discarded = 0usize;

  // Keep tracks with an id and a name; everything else only degrades.
  for (index, item) in payload.playlist.tracks.items.iter().enumerate() {
    let raw = match item.as_ref().and_then(|i| i.track.as_ref()) {
      Some(t) => t,
      None => {
        debug!(index, "discarding item: no decodable track");
        discarded += 1;
        continue;
      }
    };
    match normalize_track(raw) {
      Ok(track) => tracks.push(track),
      Err(reason) => {
        debug!(index, reason, "discarding track");
        discarded += 1;
      }
    }
  }

  let artists = distinct_artists(&tracks);
  let profiles = index_profiles(&payload.audio_features);
  let details = index_details(&payload.artists);

  // Genre tags in collection artist order.
  let genres: Vec<String> = artists
    .iter()
    .filter_map(|a| details.get(&a.id))
    .flat_map(|d| d.genres.iter().cloned())
    .collect();

  debug!(
    kept = tracks.len(),
    discarded,
    artists = artists.len(),
    profiles = profiles.len(),
    genres = genres.len(),
    "normalized catalog"
  );

  Catalog {
    tracks,
    artists,
    profiles,
    details,
    genres,
  }
}

fn normalize_track(raw: &RawTrack) -> Result<Track, &'static str> {
  let id = non_empty(raw.id.as_deref()).ok_or("missing id")?;
  let name = non_empty(raw.name.as_deref()).ok_or("missing name")?;

  let artists = raw
    .artists
    .iter()
    .flatten()
    .filter_map(|a| {
      let id = non_empty(a.id.as_deref())?;
      let name = non_empty(a.name.as_deref()).unwrap_or_else(|| id.clone());
      Some(ArtistRef { id, name })
    })
    .collect();

  let (era, album_art) = match &raw.album {
    Some(album) => (
      parse_era(album.release_date.as_deref()),
      first_image_url(&album.images),
    ),
    None => (Era::Unknown, String::new()),
  };

  Ok(Track {
    id,
    name,
    duration_ms: raw.duration_ms.unwrap_or(0),
    popularity: raw
      .popularity
      .filter(|p| p.is_finite())
      .map_or(0, |p| p.round().clamp(0.0, 100.0) as u8),
    explicit: raw.explicit.unwrap_or(false),
    artists,
    era,
    album_art,
  })
}

fn non_empty(s: Option<&str>) -> Option<String> {
  s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Permissive release-date parse: a 4-digit leading substring is the year.
pub fn parse_era(release_date: Option<&str>) -> Era {
  let date = match release_date {
    Some(d) => d.trim(),
    None => return Era::Unknown,
  };
  match date.get(..4) {
    Some(prefix) if prefix.bytes().all(|b| b.is_ascii_digit()) => match prefix.parse::<i32>() {
      Ok(year) if year > 0 => Era::Year(year),
      _ => Era::Unknown,
    },
    _ => Era::Unknown,
  }
}

/// Distinct artists across tracks, first-seen order.
fn distinct_artists(tracks: &[Track]) -> Vec<ArtistRef> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  for artist in tracks.iter().flat_map(|t| t.artists.iter()) {
    if seen.insert(artist.id.as_str()) {
      out.push(artist.clone());
    }
  }
  out
}

fn index_profiles(features: &[Option<RawAudioFeatures>]) -> HashMap<String, AcousticProfile> {
  let mut out = HashMap::new();
  for (index, raw) in features.iter().enumerate() {
    let Some(raw) = raw else {
      continue;
    };
    let Some(id) = non_empty(raw.id.as_deref()) else {
      debug!(index, "discarding audio features: missing id");
      continue;
    };
    match validate_profile(raw) {
      Some(profile) => {
        out.entry(id).or_insert(profile);
      }
      None => debug!(index, track_id = %id, "discarding audio features: invalid values"),
    }
  }
  out
}

/// Clamp unit features to [0,1]; reject missing or non-finite values and negative tempo.
pub fn validate_profile(raw: &RawAudioFeatures) -> Option<AcousticProfile> {
  let unit = |v: Option<f64>| v.filter(|x| x.is_finite()).map(|x| x.clamp(0.0, 1.0));
  let tempo = raw.tempo.filter(|t| t.is_finite() && *t >= 0.0)?;
  Some(AcousticProfile {
    danceability: unit(raw.danceability)?,
    energy: unit(raw.energy)?,
    valence: unit(raw.valence)?,
    acousticness: unit(raw.acousticness)?,
    instrumentalness: unit(raw.instrumentalness)?,
    speechiness: unit(raw.speechiness)?,
    liveness: unit(raw.liveness)?,
    tempo,
  })
}

fn index_details(artists: &[Option<RawArtistDetail>]) -> HashMap<String, ArtistDetail> {
  let mut out = HashMap::new();
  for raw in artists.iter().flatten() {
    let Some(id) = non_empty(raw.id.as_deref()) else {
      continue;
    };
    out.entry(id).or_insert_with(|| ArtistDetail {
      image: first_image_url(&raw.images),
      genres: raw
        .genres
        .iter()
        .flatten()
        .filter_map(|g| non_empty(Some(g.as_str())))
        .collect(),
    });
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn payload(value: serde_json::Value) -> CatalogPayload {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn parse_era_basics() {
    assert_eq!(parse_era(Some("1994-05-01")), Era::Year(1994));
    assert_eq!(parse_era(Some("2003")), Era::Year(2003));
    assert_eq!(parse_era(Some("1987-03")), Era::Year(1987));
    assert_eq!(parse_era(Some("")), Era::Unknown);
    assert_eq!(parse_era(Some("87")), Era::Unknown);
    assert_eq!(parse_era(Some("abcd-01-01")), Era::Unknown);
    assert_eq!(parse_era(Some("0000")), Era::Unknown);
    assert_eq!(parse_era(None), Era::Unknown);
  }

  #[test]
  fn discards_entries_without_id_or_name() {
    let p = payload(json!({
      "playlist": {"tracks": {"items": [
        {"track": {"id": "t1", "name": "One"}},
        {"track": {"id": "", "name": "No id"}},
        {"track": {"id": "t3"}},
        {"track": null},
        {"track": {"id": 5, "name": "Numeric id"}},
        42,
        {"track": {"id": "t7", "name": "Seven"}}
      ]}}
    }));
    let catalog = normalize(&p);
    let ids: Vec<_> = catalog.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t7"]);
  }

  #[test]
  fn mistyped_scalars_degrade_without_dropping_the_track() {
    let p = payload(json!({
      "playlist": {"tracks": {"items": [
        {"track": {"id": "t1", "name": "Float", "popularity": 73.0, "explicit": true}},
        {"track": {"id": "t2", "name": "Null", "explicit": null, "popularity": 40}},
        {"track": {"id": "t3", "name": "Words", "popularity": "high", "duration_ms": "long"}},
        {"track": {"id": "t4", "name": "Half", "popularity": 12.6, "duration_ms": -5}}
      ]}}
    }));
    let catalog = normalize(&p);
    let ids: Vec<_> = catalog.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4"]);
    assert_eq!(catalog.tracks[0].popularity, 73);
    assert!(catalog.tracks[0].explicit);
    assert!(!catalog.tracks[1].explicit);
    assert_eq!(catalog.tracks[1].popularity, 40);
    assert_eq!(catalog.tracks[2].popularity, 0);
    assert_eq!(catalog.tracks[2].duration_ms, 0);
    assert_eq!(catalog.tracks[3].popularity, 13);
    assert_eq!(catalog.tracks[3].duration_ms, 0);
  }

  #[test]
  fn artists_deduplicated_in_first_seen_order() {
    let p = payload(json!({
      "playlist": {"tracks": {"items": [
        {"track": {"id": "t1", "name": "A", "artists": [{"id": "b", "name": "B"}, {"id": "a", "name": "A"}]}},
        {"track": {"id": "t2", "name": "B", "artists": [{"id": "a", "name": "A"}, {"id": "c"}]}},
        {"track": {"id": "t3", "name": "C", "artists": [{"name": "No id"}]}}
      ]}}
    }));
    let catalog = normalize(&p);
    let ids: Vec<_> = catalog.artists.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(catalog.artists[2].name, "c");
    assert!(catalog.tracks[2].artists.is_empty());
  }

  #[test]
  fn popularity_clamped_and_defaults_filled() {
    let p = payload(json!({
      "playlist": {"tracks": {"items": [
        {"track": {"id": "t1", "name": "Loud", "popularity": 250}},
        {"track": {"id": "t2", "name": "Quiet", "popularity": -4, "duration_ms": 1000}}
      ]}}
    }));
    let catalog = normalize(&p);
    assert_eq!(catalog.tracks[0].popularity, 100);
    assert_eq!(catalog.tracks[0].duration_ms, 0);
    assert_eq!(catalog.tracks[1].popularity, 0);
    assert_eq!(catalog.tracks[1].era, Era::Unknown);
  }

  #[test]
  fn profiles_validated_and_first_wins() {
    let base = json!({
      "danceability": 0.5, "energy": 0.5, "valence": 0.5, "acousticness": 0.5,
      "instrumentalness": 0.0, "speechiness": 0.1, "liveness": 0.2, "tempo": 120.0
    });
    let mut first = base.clone();
    first["id"] = json!("t1");
    let mut second = base.clone();
    second["id"] = json!("t1");
    second["tempo"] = json!(99.0);
    let mut over = base.clone();
    over["id"] = json!("t2");
    over["energy"] = json!(1.7);
    let mut bad_tempo = base.clone();
    bad_tempo["id"] = json!("t3");
    bad_tempo["tempo"] = json!(-1.0);
    let mut missing = base;
    missing["id"] = json!("t4");
    missing["valence"] = serde_json::Value::Null;

    let p = payload(json!({"audio_features": [first, second, over, bad_tempo, missing, null]}));
    let catalog = normalize(&p);
    assert_eq!(catalog.profile("t1").unwrap().tempo, 120.0);
    assert_eq!(catalog.profile("t2").unwrap().energy, 1.0);
    assert!(catalog.profile("t3").is_none());
    assert!(catalog.profile("t4").is_none());
  }

  #[test]
  fn genres_follow_collection_artist_order() {
    let p = payload(json!({
      "playlist": {"tracks": {"items": [
        {"track": {"id": "t1", "name": "A", "artists": [{"id": "x", "name": "X"}, {"id": "y", "name": "Y"}]}}
      ]}},
      "artists": [
        {"id": "y", "genres": ["Indie Pop"], "images": [{"url": "https://img/y"}]},
        {"id": "x", "genres": ["soul", "", "funk"]},
        {"id": "z", "genres": ["metal"]}
      ]
    }));
    let catalog = normalize(&p);
    assert_eq!(catalog.genres, vec!["soul", "funk", "Indie Pop"]);
    assert_eq!(catalog.genre_text(), "soul funk indie pop");
    assert_eq!(catalog.artist_image("y"), Some("https://img/y"));
    assert_eq!(catalog.artist_image("x"), None);
  }

  #[test]
  fn non_array_items_decode_as_empty() {
    let p = payload(json!({"playlist": {"tracks": {"items": "oops"}}, "artists": 7}));
    let catalog = normalize(&p);
    assert!(catalog.tracks.is_empty());
    assert!(catalog.details.is_empty());
  }
}
