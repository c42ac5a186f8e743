//! Frequency ranking and numeric summaries

use std::cmp::Ordering;
use std::collections::HashMap;

use super::models::{KeyCount, PairCount, StatSummary};

/// Summarize a sample into count/min/max/avg/p50/p95.
///
/// An empty sample yields an all-zero summary.
pub fn summarize(values: &[f64]) -> StatSummary {
    if values.is_empty() {
        return StatSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let sum: f64 = sorted.iter().sum();

    StatSummary {
        count: sorted.len(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        avg: sum / sorted.len() as f64,
        p50: quantile(&sorted, 0.50),
        p95: quantile(&sorted, 0.95),
    }
}

/// Linearly interpolated quantile over an ascending sample
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    if q <= 0.0 {
        return first;
    }
    if q >= 1.0 {
        return last;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Descending count, ties broken by ascending key
fn rank(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

pub fn to_key_counts(counts: HashMap<String, usize>) -> Vec<KeyCount> {
    let mut out: Vec<KeyCount> = counts
        .into_iter()
        .map(|(key, count)| KeyCount { key, count })
        .collect();
    out.sort_by(|a, b| rank((&a.key, a.count), (&b.key, b.count)));
    out
}

pub fn to_pair_counts(counts: HashMap<String, usize>) -> Vec<PairCount> {
    let mut out: Vec<PairCount> = counts
        .into_iter()
        .map(|(pair, count)| PairCount { pair, count })
        .collect();
    out.sort_by(|a, b| rank((&a.pair, a.count), (&b.pair, b.count)));
    out
}

/// Canonical key for every unordered pair of track ids, smaller id first
pub fn pair_keys(track_ids: &[i64]) -> Vec<String> {
    let mut keys = Vec::new();
    for (i, &a) in track_ids.iter().enumerate() {
        for &b in &track_ids[i + 1..] {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            keys.push(format!("{lo}-{hi}"));
        }
    }
    keys
}
