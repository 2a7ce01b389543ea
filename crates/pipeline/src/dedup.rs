//! Keyed deduplication with selectable representative policy.
//!
//! Output order always follows the first occurrence of each key, so every
//! policy is deterministic given a deterministic input order.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use etl_core::DedupPolicy;

/// Collapses rows sharing a key to one representative per key.
pub fn dedup_by_key<R, K, F>(rows: &[R], policy: DedupPolicy, key: F) -> Vec<R>
where
    R: Clone + PartialEq,
    K: Hash + Eq,
    F: Fn(&R) -> K,
{
    match policy {
        DedupPolicy::First => dedup_first(rows, key),
        DedupPolicy::Last => dedup_last(rows, key),
        DedupPolicy::MostFrequent => dedup_most_frequent(rows, key),
    }
}

fn dedup_first<R: Clone, K: Hash + Eq>(rows: &[R], key: impl Fn(&R) -> K) -> Vec<R> {
    let mut seen: HashSet<K> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if seen.insert(key(row)) {
            out.push(row.clone());
        }
    }
    out
}

fn dedup_last<R: Clone, K: Hash + Eq>(rows: &[R], key: impl Fn(&R) -> K) -> Vec<R> {
    let mut slot: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<R> = Vec::new();
    for row in rows {
        match slot.get(&key(row)) {
            Some(&idx) => out[idx] = row.clone(),
            None => {
                slot.insert(key(row), out.len());
                out.push(row.clone());
            }
        }
    }
    out
}

fn dedup_most_frequent<R: Clone + PartialEq, K: Hash + Eq>(
    rows: &[R],
    key: impl Fn(&R) -> K,
) -> Vec<R> {
    // Per key: distinct row values with occurrence counts, in first-seen
    // order so ties break to the earliest value.
    let mut slot: HashMap<K, usize> = HashMap::new();
    let mut candidates: Vec<Vec<(R, usize)>> = Vec::new();
    for row in rows {
        let idx = *slot.entry(key(row)).or_insert_with(|| {
            candidates.push(Vec::new());
            candidates.len() - 1
        });
        match candidates[idx].iter_mut().find(|(r, _)| r == row) {
            Some((_, count)) => *count += 1,
            None => candidates[idx].push((row.clone(), 1)),
        }
    }
    candidates
        .into_iter()
        .map(|variants| {
            variants
                .into_iter()
                .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
                .map(|(row, _)| row)
                .expect("every key has at least one variant")
        })
        .collect()
}
