//! Top-K artists and tracks. Stable sorts: ties keep first-seen order.

use std::collections::HashSet;

use crate::types::{ArtistTally, RankedArtist, RankedTrack, Track};

/// Placeholder multiplier for `approx_plays`; has no statistical basis.
pub const APPROX_PLAYS_PER_POPULARITY_POINT: u64 = 1_000_000;

/// Top `k` artists by appearance count; rank is 1-based list position.
pub fn top_artists(tallies: &[ArtistTally], k: usize) -> Vec<RankedArtist> {
  let mut sorted: Vec<&ArtistTally> = tallies.iter().collect();
  sorted.sort_by(|a, b| b.count.cmp(&a.count));
  sorted
    .into_iter()
    .take(k)
    .enumerate()
    .map(|(i, tally)| RankedArtist {
      rank: i + 1,
      id: tally.id.clone(),
      name: tally.name.clone(),
      tracks: tally.count,
      image: tally.image.clone().unwrap_or_default(),
    })
    .collect()
}

/// Top `k` tracks by popularity; a repeated track id is ranked once.
pub fn top_tracks(tracks: &[Track], k: usize) -> Vec<RankedTrack> {
  let mut seen = HashSet::new();
  let mut unique: Vec<&Track> = tracks
    .iter()
    .filter(|t| seen.insert(t.id.as_str()))
    .collect();
  unique.sort_by(|a, b| b.popularity.cmp(&a.popularity));
  unique
    .into_iter()
    .take(k)
    .enumerate()
    .map(|(i, track)| RankedTrack {
      rank: i + 1,
      id: track.id.clone(),
      name: track.name.clone(),
      artist: track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", "),
      album_art: track.album_art.clone(),
      popularity: track.popularity,
      approx_plays: u64::from(track.popularity) * APPROX_PLAYS_PER_POPULARITY_POINT,
    })
    .collect()
}
