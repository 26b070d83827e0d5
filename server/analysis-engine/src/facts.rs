//! Human-readable facts: genre/keyword facts first, acoustic fallbacks after,
//! a size fact last. Capped, deduplicated, never padded.

use crate::aggregate::percentage;
use crate::config::Config;
use crate::types::{EraDistribution, GenreCount, Stats};

/// A keyword family that yields one fact when any keyword is found.
#[derive(Debug, Clone, Copy)]
pub struct FactFamily {
  pub keywords: &'static [&'static str],
  pub text: &'static str,
}

/// Checked in this order after the dominant-genre and decade facts.
pub const FACT_FAMILIES: &[FactFamily] = &[
  FactFamily {
    keywords: &["soul", "r&b", "neo-soul"],
    text: "🎷 Soulful and smooth - perfect for unwinding",
  },
  FactFamily {
    keywords: &["disco", "funk", "boogie"],
    text: "🪩 Disco & funk flavors - get your groove on!",
  },
  FactFamily {
    keywords: &["melanchol", "sad", "emo"],
    text: "💔 Melancholic undertones throughout",
  },
  FactFamily {
    keywords: &["classic", "oldies", "retro"],
    text: "🎙️ Classic old school vibes",
  },
  FactFamily {
    keywords: &["hip hop", "rap"],
    text: "🎤 Hip-hop & rap influences strong",
  },
  FactFamily {
    keywords: &["indie", "alternative"],
    text: "🎸 Indie & alternative edge",
  },
  FactFamily {
    keywords: &["electronic", "edm", "house"],
    text: "🎛️ Electronic beats drive this playlist",
  },
];

pub const FAST_TEMPO_BPM: u32 = 140;
pub const UPBEAT_TEMPO_BPM: u32 = 120;
pub const SLOW_TEMPO_BPM: u32 = 90;
pub const HIGH_VALENCE: f64 = 0.7;
pub const LOW_VALENCE: f64 = 0.3;
pub const HIGH_ENERGY: f64 = 0.8;
pub const LOW_ENERGY: f64 = 0.3;
pub const HIGH_DANCEABILITY: f64 = 0.8;
pub const HIGH_ACOUSTICNESS: f64 = 0.6;

/// Ordered, duplicate-free fact accumulator threaded through the cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSheet {
  facts: Vec<String>,
}

impl FactSheet {
  pub fn len(&self) -> usize {
    self.facts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.facts.is_empty()
  }

  /// Append unless the same text is already present.
  pub fn push(&mut self, fact: impl Into<String>) {
    let fact = fact.into();
    if !self.facts.contains(&fact) {
      self.facts.push(fact);
    }
  }

  pub fn into_vec(self, cap: usize) -> Vec<String> {
    let mut facts = self.facts;
    facts.truncate(cap);
    facts
  }
}

/// Everything the cascade reads; all produced by upstream stages.
#[derive(Debug, Clone, Copy)]
pub struct FactInputs<'a> {
  /// Already lowercased by the catalog.
  pub genre_text: &'a str,
  pub top_genres: &'a [GenreCount],
  pub eras: &'a EraDistribution,
  pub stats: &'a Stats,
}

pub fn generate(inputs: &FactInputs<'_>, config: &Config) -> Vec<String> {
  let sheet = FactSheet::default();
  let sheet = genre_facts(sheet, inputs);
  let sheet = acoustic_facts(sheet, inputs.stats, config);
  let sheet = size_fact(sheet, inputs.stats, config);
  sheet.into_vec(config.max_facts)
}

/// Dominant genres, dominant decade, then one fact per matching family.
pub fn genre_facts(mut sheet: FactSheet, inputs: &FactInputs<'_>) -> FactSheet {
  let dominant: Vec<&str> = inputs
    .top_genres
    .iter()
    .take(2)
    .map(|g| g.name.as_str())
    .collect();
  if !dominant.is_empty() {
    sheet.push(format!("🎵 Dominated by {} vibes", dominant.join(" & ")));
  }

  if let Some(top) = inputs.eras.buckets.first() {
    sheet.push(format!(
      "📅 {}% of tracks are from the {}",
      percentage(top.value, inputs.stats.total_tracks),
      top.name
    ));
  }

  for family in FACT_FAMILIES {
    if family.keywords.iter().any(|k| inputs.genre_text.contains(k)) {
      sheet.push(family.text);
    }
  }
  sheet
}

/// Fallback on averaged features; skipped when enough facts exist or no
/// track carries a profile.
pub fn acoustic_facts(mut sheet: FactSheet, stats: &Stats, config: &Config) -> FactSheet {
  if sheet.len() >= config.fact_fallback_threshold || stats.tracks_with_features == 0 {
    return sheet;
  }
  let avg = &stats.audio_features;
  let tempo = stats.avg_tempo;

  if tempo > FAST_TEMPO_BPM {
    sheet.push(format!("🚀 Fast-paced at {} BPM", tempo));
  } else if tempo > UPBEAT_TEMPO_BPM {
    sheet.push(format!("💃 Upbeat tempo at {} BPM - perfect for dancing", tempo));
  } else if tempo < SLOW_TEMPO_BPM {
    sheet.push(format!("🌊 Slow and smooth at {} BPM", tempo));
  }

  let room = |sheet: &FactSheet| sheet.len() < config.acoustic_fact_limit;

  if room(&sheet) && avg.valence > HIGH_VALENCE {
    sheet.push("🎉 Extremely upbeat and cheerful!");
  } else if room(&sheet) && avg.valence < LOW_VALENCE {
    sheet.push("💭 Deep and introspective mood");
  }

  if room(&sheet) && avg.energy > HIGH_ENERGY {
    sheet.push("⚡ High-energy - perfect for workouts!");
  } else if room(&sheet) && avg.energy < LOW_ENERGY {
    sheet.push("🌙 Low-key and relaxing atmosphere");
  }

  if room(&sheet) && avg.danceability > HIGH_DANCEABILITY {
    sheet.push("🕺 Impossible to sit still!");
  }

  if room(&sheet) && avg.acousticness > HIGH_ACOUSTICNESS {
    sheet.push("🎸 Acoustic and organic sounds");
  }
  sheet
}

pub fn size_fact(mut sheet: FactSheet, stats: &Stats, config: &Config) -> FactSheet {
  if sheet.len() < config.max_facts && stats.total_tracks > config.large_collection_tracks {
    sheet.push(format!("📚 Massive collection with {} tracks!", stats.total_tracks));
  }
  sheet
}
