//! Word -> pronunciation resolution.
//!
//! Dictionary words resolve directly. Anything else is split into a known
//! prefix and a recursively resolvable suffix, e.g. `jonathon` -> `jon` + `athon`.
//! Splits are tried from the middle of the word outwards, so the first
//! successful split is the most balanced one; on a tie the earlier split wins.
//!
//! Decomposition results are memoized in a caller-owned [`DecompositionCache`]:
//! names share endings (`-lyn`, `-son`, `-anna`), and without the cache the
//! same suffixes would be re-split for every name.

use std::collections::HashMap;

use crate::data::PronouncingDictionary;
use crate::domain::Transcription;

/// Memoized decomposition results keyed by lowercased word.
///
/// Entries are written once and never invalidated. `hits`/`misses` count
/// lookups so callers can check that no word is decomposed twice.
#[derive(Debug, Clone, Default)]
pub struct DecompositionCache {
    entries: HashMap<String, Vec<Transcription>>,
    hits: usize,
    misses: usize,
}

impl DecompositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self, word: &str) -> Option<&[Transcription]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of decompositions actually computed.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Every known pronunciation of `word`.
///
/// A dictionary hit is returned verbatim and never touches the cache. An empty
/// result means the word could not be resolved.
pub fn resolve(
    word: &str,
    dictionary: &PronouncingDictionary,
    cache: &mut DecompositionCache,
) -> Vec<Transcription> {
    if let Some(found) = dictionary.lookup(word) {
        return found.to_vec();
    }
    decompose(word, dictionary, cache)
}

/// Memoized recursive decomposition of `word` into dictionary pieces.
pub fn decompose(
    word: &str,
    dictionary: &PronouncingDictionary,
    cache: &mut DecompositionCache,
) -> Vec<Transcription> {
    let key = word.to_lowercase();
    if let Some(cached) = cache.entries.get(&key) {
        cache.hits += 1;
        return cached.clone();
    }
    cache.misses += 1;

    let result = decompose_uncached(&key, dictionary, cache);
    cache.entries.insert(key, result.clone());
    result
}

fn decompose_uncached(
    word: &str,
    dictionary: &PronouncingDictionary,
    cache: &mut DecompositionCache,
) -> Vec<Transcription> {
    if let Some(found) = dictionary.lookup(word) {
        return found.to_vec();
    }

    for split in split_order(word) {
        let (prefix, suffix) = word.split_at(split);
        let Some(heads) = dictionary.lookup(prefix) else {
            continue;
        };
        let tails = decompose(suffix, dictionary, cache);
        if tails.is_empty() {
            continue;
        }
        return heads
            .iter()
            .flat_map(|head| tails.iter().map(move |tail| head.concat(tail)))
            .collect();
    }

    Vec::new()
}

/// Byte offsets of the internal split points of `word`, closest to the middle
/// first, earlier offset first on ties.
pub fn split_order(word: &str) -> Vec<usize> {
    let n = word.chars().count();
    let mut splits: Vec<(usize, usize)> = word
        .char_indices()
        .enumerate()
        .skip(1)
        .map(|(k, (offset, _))| ((2 * k).abs_diff(n), offset))
        .collect();
    splits.sort();
    splits.into_iter().map(|(_, offset)| offset).collect()
}
