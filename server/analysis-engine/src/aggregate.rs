//! Scalar statistics: counts, durations, popularity, averaged acoustic features.

use std::collections::HashMap;

use crate::types::{AcousticProfile, ArtistTally, Catalog, FeatureAverages, Stats};

/// Appearance count per artist, first-seen order (one count per track credit).
pub fn tally_artists(catalog: &Catalog) -> Vec<ArtistTally> {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut tallies: Vec<ArtistTally> = Vec::new();
  for artist in catalog.tracks.iter().flat_map(|t| t.artists.iter()) {
    match index.get(artist.id.as_str()) {
      Some(&i) => tallies[i].count += 1,
      None => {
        index.insert(artist.id.as_str(), tallies.len());
        tallies.push(ArtistTally {
          id: artist.id.clone(),
          name: artist.name.clone(),
          count: 1,
          image: catalog.artist_image(&artist.id).map(str::to_string),
        });
      }
    }
  }
  tallies
}

/// Mean of each measurement over tracks that have a profile.
///
/// Returns the averages and the number of profiled tracks; all zero when none.
pub fn average_features(catalog: &Catalog) -> (FeatureAverages, usize) {
  let mut sum = FeatureAverages::default();
  let mut count = 0usize;
  for profile in catalog.tracks.iter().filter_map(|t| catalog.profile(&t.id)) {
    accumulate(&mut sum, profile);
    count += 1;
  }
  let denom = count.max(1) as f64;
  let avg = FeatureAverages {
    danceability: sum.danceability / denom,
    energy: sum.energy / denom,
    valence: sum.valence / denom,
    acousticness: sum.acousticness / denom,
    instrumentalness: sum.instrumentalness / denom,
    speechiness: sum.speechiness / denom,
    liveness: sum.liveness / denom,
    tempo: sum.tempo / denom,
  };
  (avg, count)
}

fn accumulate(acc: &mut FeatureAverages, p: &AcousticProfile) {
  acc.danceability += p.danceability;
  acc.energy += p.energy;
  acc.valence += p.valence;
  acc.acousticness += p.acousticness;
  acc.instrumentalness += p.instrumentalness;
  acc.speechiness += p.speechiness;
  acc.liveness += p.liveness;
  acc.tempo += p.tempo;
}

/// Full stats block; zeroed (never absent) for an empty catalog.
pub fn compute_stats(catalog: &Catalog, tallies: &[ArtistTally]) -> Stats {
  let total_tracks = catalog.tracks.len();
  // Saturate: catalog durations are untrusted.
  let total_duration_ms = catalog
    .tracks
    .iter()
    .fold(0u64, |acc, t| acc.saturating_add(t.duration_ms));
  let popularity_sum: u64 = catalog.tracks.iter().map(|t| u64::from(t.popularity)).sum();
  let explicit_count = catalog.tracks.iter().filter(|t| t.explicit).count();
  let (audio_features, tracks_with_features) = average_features(catalog);

  let denom = total_tracks.max(1) as f64;
  Stats {
    total_tracks,
    total_duration_ms,
    total_duration: format_duration(total_duration_ms),
    total_artists: tallies.len(),
    avg_popularity: (popularity_sum as f64 / denom).round().clamp(0.0, 100.0) as u8,
    avg_tempo: audio_features.tempo.round().max(0.0) as u32,
    explicit_percentage: percentage(explicit_count, total_tracks),
    tracks_with_features,
    audio_features,
  }
}

/// `part / whole` as a rounded percentage in [0,100]; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u8 {
  if whole == 0 {
    return 0;
  }
  ((part as f64 / whole as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// "2h 5m" when at least an hour, else "42m".
pub fn format_duration(ms: u64) -> String {
  let hours = ms / 3_600_000;
  let minutes = (ms % 3_600_000) / 60_000;
  if hours > 0 {
    format!("{}h {}m", hours, minutes)
  } else {
    format!("{}m", minutes)
  }
}
