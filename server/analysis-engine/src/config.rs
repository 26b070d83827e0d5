//! Engine configuration with sane defaults.
//!
//! Only caps and fact thresholds are tunable. Mood weights and keyword tables
//! are fixed constants in [`crate::mood`] and [`crate::facts`].

use serde::Deserialize;

use crate::error::EngineError;

/// Output caps and fact-cascade thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Max entries in the ranked artist list.
  pub top_artists: usize,
  /// Max entries in the ranked track list.
  pub top_tracks: usize,
  /// Max entries in the ranked genre list.
  pub top_genres: usize,
  /// Max decade buckets kept in the era distribution.
  pub max_eras: usize,
  /// Max moods kept after scoring.
  pub max_moods: usize,
  /// Hard cap on the fact list.
  pub max_facts: usize,
  /// Acoustic fallback facts run only while fewer facts than this exist.
  pub fact_fallback_threshold: usize,
  /// Later acoustic fallback steps contribute only below this count.
  pub acoustic_fact_limit: usize,
  /// Track count above which the size fact is appended.
  pub large_collection_tracks: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      top_artists: 10,
      top_tracks: 10,
      top_genres: 10,
      max_eras: 6,
      max_moods: 5,
      max_facts: 6,
      fact_fallback_threshold: 4,
      acoustic_fact_limit: 5,
      large_collection_tracks: 100,
    }
  }
}

impl Config {
  /// Parse a (possibly partial) TOML document; missing keys keep their defaults.
  pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
    Ok(toml::from_str(s)?)
  }
}
