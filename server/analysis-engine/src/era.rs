//! Release-decade distribution.

use std::collections::HashMap;

use crate::types::{EraBucket, EraDistribution, Track};

/// Bucket tracks by decade, most populated first, at most `max_buckets`.
///
/// Ties keep the order decades were first met. Tracks in cut decades land in
/// `other`, tracks without a year in `unknown`.
pub fn distribution(tracks: &[Track], max_buckets: usize) -> EraDistribution {
  let mut index: HashMap<i32, usize> = HashMap::new();
  let mut counts: Vec<(i32, usize)> = Vec::new();
  let mut unknown = 0usize;

  for decade in tracks.iter().map(|t| t.era.decade()) {
    let Some(decade) = decade else {
      unknown += 1;
      continue;
    };
    match index.get(&decade) {
      Some(&i) => counts[i].1 += 1,
      None => {
        index.insert(decade, counts.len());
        counts.push((decade, 1));
      }
    }
  }

  // Stable: equal counts keep first-encountered order.
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  let other: usize = counts.iter().skip(max_buckets).map(|(_, n)| n).sum();
  let buckets = counts
    .into_iter()
    .take(max_buckets)
    .map(|(decade, value)| EraBucket {
      name: decade_label(decade),
      decade,
      value,
    })
    .collect();

  EraDistribution {
    buckets,
    other,
    unknown,
  }
}

pub fn decade_label(decade: i32) -> String {
  format!("{}s", decade)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Era;

  fn track(era: Era) -> Track {
    Track {
      id: "t".into(),
      name: "t".into(),
      duration_ms: 0,
      popularity: 0,
      explicit: false,
      artists: Vec::new(),
      era,
      album_art: String::new(),
    }
  }

  fn years(ys: &[i32]) -> Vec<Track> {
    ys.iter().map(|&y| track(Era::Year(y))).collect()
  }

  #[test]
  fn single_decade() {
    let dist = distribution(&years(&[1994, 1994, 1994]), 6);
    assert_eq!(dist.buckets.len(), 1);
    assert_eq!(dist.buckets[0].name, "1990s");
    assert_eq!(dist.buckets[0].value, 3);
    assert_eq!(dist.other, 0);
    assert_eq!(dist.unknown, 0);
  }

  #[test]
  fn ties_keep_first_encountered_order() {
    let dist = distribution(&years(&[2011, 1975, 1989, 1971, 2015, 1982]), 6);
    let names: Vec<_> = dist.buckets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["2010s", "1970s", "1980s"]);
  }

  #[test]
  fn cap_moves_remainder_to_other() {
    let mut tracks = years(&[1951, 1962, 1973, 1984, 1995, 2006, 2017, 2017]);
    tracks.push(track(Era::Unknown));
    let dist = distribution(&tracks, 6);
    assert_eq!(dist.buckets.len(), 6);
    assert_eq!(dist.buckets[0].name, "2010s");
    assert_eq!(dist.other, 1);
    assert_eq!(dist.unknown, 1);
    let total: usize = dist.buckets.iter().map(|b| b.value).sum::<usize>() + dist.other + dist.unknown;
    assert_eq!(total, tracks.len());
  }

  #[test]
  fn empty_input_is_empty_distribution() {
    assert_eq!(distribution(&[], 6), EraDistribution::default());
  }
}
