//! Mood profile: keyword evidence from genre tags blended with averaged
//! acoustic features.
//!
//! Keyword signal: for each family, count keyword occurrences (overlapping,
//! case-insensitive) in the collection's genre text, then divide by the sum of
//! all families' counts. Acoustic signal: fixed weighted sums over
//! [`FeatureAverages`]. Weights are points out of 100 per formula.

use tracing::debug;

use crate::genre::count_overlapping;
use crate::types::{FeatureAverages, Mood};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordFamily {
  Happy,
  Melancholy,
  Energetic,
  Chill,
  Soulful,
  OldSchool,
  Romantic,
  Aggressive,
  Groovy,
  Dreamy,
}

/// Lowercase substring keywords per family. Every family feeds the
/// normalization denominator, including those no formula reads.
pub const MOOD_KEYWORDS: &[(KeywordFamily, &[&str])] = &[
  (
    KeywordFamily::Happy,
    &["happy", "disco", "dance", "party", "funk", "pop", "tropical", "summer", "upbeat", "feel-good"],
  ),
  (
    KeywordFamily::Melancholy,
    &["sad", "melancholy", "emo", "blues", "ballad", "heartbreak", "slow", "emotional"],
  ),
  (
    KeywordFamily::Energetic,
    &["edm", "electronic", "house", "techno", "drum and bass", "dubstep", "hardcore", "metal", "punk", "rock"],
  ),
  (
    KeywordFamily::Chill,
    &["chill", "ambient", "lo-fi", "lofi", "relaxing", "smooth", "easy listening", "new age", "meditation"],
  ),
  (
    KeywordFamily::Soulful,
    &["soul", "r&b", "rnb", "gospel", "motown", "neo-soul", "jazz"],
  ),
  (
    KeywordFamily::OldSchool,
    &["classic", "oldies", "retro", "vintage", "70s", "80s", "90s", "old school"],
  ),
  (
    KeywordFamily::Romantic,
    &["romantic", "love", "sensual", "slow jam", "latin", "bossa nova"],
  ),
  (
    KeywordFamily::Aggressive,
    &["metal", "hardcore", "punk", "thrash", "death", "black metal", "grindcore"],
  ),
  (
    KeywordFamily::Groovy,
    &["funk", "groove", "disco", "boogie", "bass"],
  ),
  (
    KeywordFamily::Dreamy,
    &["dream", "shoegaze", "ethereal", "atmospheric", "synth", "wave"],
  ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
  Danceability,
  Energy,
  Valence,
  Acousticness,
}

impl Feature {
  fn of(self, avg: &FeatureAverages) -> f64 {
    match self {
      Feature::Danceability => avg.danceability,
      Feature::Energy => avg.energy,
      Feature::Valence => avg.valence,
      Feature::Acousticness => avg.acousticness,
    }
  }
}

/// One weighted term of a mood formula.
#[derive(Debug, Clone, Copy)]
pub enum Term {
  /// weight × feature
  Feature(Feature, f64),
  /// weight × (1 − feature)
  Inverted(Feature, f64),
  /// weight × sum of the families' keyword shares
  Keywords(&'static [KeywordFamily], f64),
}

#[derive(Debug, Clone, Copy)]
pub struct MoodFormula {
  pub name: &'static str,
  pub terms: &'static [Term],
}

pub const HAPPY: MoodFormula = MoodFormula {
  name: "Happy",
  terms: &[
    Term::Feature(Feature::Valence, 50.0),
    Term::Keywords(&[KeywordFamily::Happy], 50.0),
  ],
};

pub const ENERGETIC: MoodFormula = MoodFormula {
  name: "Energetic",
  terms: &[
    Term::Feature(Feature::Energy, 50.0),
    Term::Keywords(&[KeywordFamily::Energetic], 50.0),
  ],
};

pub const DANCEABLE: MoodFormula = MoodFormula {
  name: "Danceable",
  terms: &[
    Term::Feature(Feature::Danceability, 50.0),
    Term::Keywords(&[KeywordFamily::Groovy, KeywordFamily::Happy], 50.0),
  ],
};

pub const CHILL: MoodFormula = MoodFormula {
  name: "Chill",
  terms: &[
    Term::Inverted(Feature::Energy, 40.0),
    Term::Feature(Feature::Acousticness, 20.0),
    Term::Keywords(&[KeywordFamily::Chill], 40.0),
  ],
};

pub const MELANCHOLY: MoodFormula = MoodFormula {
  name: "Melancholy",
  terms: &[
    Term::Inverted(Feature::Valence, 50.0),
    Term::Keywords(&[KeywordFamily::Melancholy], 50.0),
  ],
};

pub const SOULFUL: MoodFormula = MoodFormula {
  name: "Soulful",
  terms: &[
    Term::Keywords(&[KeywordFamily::Soulful], 70.0),
    Term::Feature(Feature::Acousticness, 30.0),
  ],
};

pub const OLD_SCHOOL: MoodFormula = MoodFormula {
  name: "Old School",
  terms: &[Term::Keywords(&[KeywordFamily::OldSchool], 100.0)],
};

/// Scored in this order; equal scores keep it after sorting.
pub const MOOD_FORMULAS: &[MoodFormula] = &[
  HAPPY, ENERGETIC, DANCEABLE, CHILL, MELANCHOLY, SOULFUL, OLD_SCHOOL,
];

pub const MAX_MOOD_SCORE: f64 = 100.0;

/// Raw keyword counts per family plus their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordShares {
  counts: Vec<(KeywordFamily, usize)>,
  total: usize,
}

impl KeywordShares {
  /// Scan genre text against [`MOOD_KEYWORDS`]. Expects the lowercased
  /// text from [`Catalog::genre_text`](crate::types::Catalog::genre_text).
  pub fn scan(genre_text: &str) -> Self {
    let counts: Vec<(KeywordFamily, usize)> = MOOD_KEYWORDS
      .iter()
      .map(|(family, keywords)| {
        let n: usize = keywords.iter().map(|k| count_overlapping(genre_text, k)).sum();
        (*family, n)
      })
      .collect();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    Self { counts, total }
  }

  pub fn count(&self, family: KeywordFamily) -> usize {
    self
      .counts
      .iter()
      .find(|(f, _)| *f == family)
      .map(|(_, n)| *n)
      .unwrap_or(0)
  }

  /// Family count over the sum of all families (denominator floored at 1).
  pub fn share(&self, family: KeywordFamily) -> f64 {
    self.count(family) as f64 / self.total.max(1) as f64
  }
}

/// Raw (unrounded, unclamped) score of one formula. Acoustic terms are zero
/// when `features` is `None`.
pub fn evaluate(formula: &MoodFormula, shares: &KeywordShares, features: Option<&FeatureAverages>) -> f64 {
  formula
    .terms
    .iter()
    .map(|term| match (*term, features) {
      (Term::Feature(f, w), Some(avg)) => w * f.of(avg),
      (Term::Inverted(f, w), Some(avg)) => w * (1.0 - f.of(avg)),
      (Term::Feature(..), None) | (Term::Inverted(..), None) => 0.0,
      (Term::Keywords(families, w), _) => w * families.iter().map(|f| shares.share(*f)).sum::<f64>(),
    })
    .sum()
}

/// Ranked mood list: rounded, scores ≤ 0 dropped, clamped to 100, top `max_moods`.
pub fn score_moods(genre_text: &str, features: Option<&FeatureAverages>, max_moods: usize) -> Vec<Mood> {
  let shares = KeywordShares::scan(genre_text);
  debug!(keyword_hits = shares.total, "scanned genre keywords");

  let mut moods: Vec<Mood> = MOOD_FORMULAS
    .iter()
    .map(|formula| (formula.name, evaluate(formula, &shares, features).round()))
    .filter(|(_, score)| *score > 0.0)
    .map(|(name, score)| Mood {
      name: name.to_string(),
      value: score.min(MAX_MOOD_SCORE) as u8,
    })
    .collect();
  moods.sort_by(|a, b| b.value.cmp(&a.value));
  moods.truncate(max_moods);
  moods
}
