//! Genre tag tally across the collection's artists.

use std::collections::HashMap;

use crate::types::GenreCount;

/// Count identical tags, most frequent first; ties keep first-seen order.
pub fn rank_genres(genres: &[String], k: usize) -> Vec<GenreCount> {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut counts: Vec<GenreCount> = Vec::new();
  for genre in genres {
    match index.get(genre.as_str()) {
      Some(&i) => counts[i].count += 1,
      None => {
        index.insert(genre.as_str(), counts.len());
        counts.push(GenreCount {
          name: genre.clone(),
          count: 1,
        });
      }
    }
  }
  counts.sort_by(|a, b| b.count.cmp(&a.count));
  counts.truncate(k);
  counts
}

/// Number of occurrences of `needle` in `haystack`, overlapping ones included.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
  if needle.is_empty() {
    return 0;
  }
  haystack
    .char_indices()
    .filter(|(i, _)| haystack[*i..].starts_with(needle))
    .count()
}
