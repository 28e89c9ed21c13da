//! CMU pronouncing dictionary: loading, one-time download, lookups.
//!
//! Two published text layouts are accepted:
//!
//! - `cmudict-0.7b`: `JOHN  JH AA1 N`, variants as `JOHN(1)`, `;;;` comments
//! - cmusphinx `cmudict.dict`: `john JH AA1 N`, variants as `john(2)`, trailing `# ...` comments

use std::collections::HashMap;
use std::fs::{self, create_dir_all};
use std::path::Path;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::Transcription;
use crate::error::AppError;

pub const DEFAULT_DICTIONARY_URL: &str =
    "https://raw.githubusercontent.com/cmusphinx/cmudict/master/cmudict.dict";

/// Lowercased word -> every listed pronunciation, in file order.
#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    entries: HashMap<String, Vec<Transcription>>,
}

impl PronouncingDictionary {
    pub fn parse(text: &str) -> Self {
        let mut entries: HashMap<String, Vec<Transcription>> = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let line = line.split('#').next().unwrap_or("");

            let mut tokens = line.split_whitespace();
            let Some(head) = tokens.next() else {
                continue;
            };
            let phones: Vec<String> = tokens.map(str::to_string).collect();
            if phones.is_empty() {
                continue;
            }

            entries
                .entry(strip_variant_marker(head).to_lowercase())
                .or_default()
                .push(Transcription::new(phones));
        }

        Self { entries }
    }

    /// Build from `(word, "PH PH PH")` pairs; repeated words add variants.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries: HashMap<String, Vec<Transcription>> = HashMap::new();
        for (word, phones) in pairs {
            entries
                .entry(word.to_lowercase())
                .or_default()
                .push(Transcription::parse(phones));
        }
        Self { entries }
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, word: &str) -> Option<&[Transcription]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the dictionary from `path`, downloading it from `url` first when the
/// file does not exist yet.
pub fn load_or_fetch(path: &Path, url: &str) -> Result<PronouncingDictionary, AppError> {
    if !path.exists() {
        info!(url, path = %path.display(), "pronouncing dictionary not found locally, downloading");
        let body = fetch_dictionary(url)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(|e| {
                AppError::runtime(format!("Failed to create dictionary dir '{}': {e}", parent.display()))
            })?;
        }
        fs::write(path, body.as_bytes()).map_err(|e| {
            AppError::runtime(format!("Failed to save dictionary to '{}': {e}", path.display()))
        })?;
    }

    // cmudict-0.7b is not valid UTF-8 in a handful of comment lines.
    let bytes = fs::read(path)
        .map_err(|e| AppError::runtime(format!("Failed to read dictionary '{}': {e}", path.display())))?;
    let dictionary = PronouncingDictionary::parse(&String::from_utf8_lossy(&bytes));

    if dictionary.is_empty() {
        return Err(AppError::runtime(format!(
            "Pronouncing dictionary '{}' contains no entries.",
            path.display()
        )));
    }

    debug!(words = dictionary.len(), "pronouncing dictionary loaded");
    Ok(dictionary)
}

fn fetch_dictionary(url: &str) -> Result<String, AppError> {
    let resp = Client::new()
        .get(url)
        .send()
        .map_err(|e| AppError::runtime(format!("Dictionary download failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::runtime(format!(
            "Dictionary download failed with status {}.",
            resp.status()
        )));
    }

    resp.text()
        .map_err(|e| AppError::runtime(format!("Failed to read dictionary download: {e}")))
}

/// Number of vowel phonemes, i.e. tokens carrying a stress digit.
pub fn syllable_count(transcription: &Transcription) -> u32 {
    transcription
        .phones()
        .iter()
        .filter(|phone| phone.chars().any(|c| matches!(c, '0'..='2')))
        .count() as u32
}

fn strip_variant_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') && idx > 0 => &word[..idx],
        _ => word,
    }
}
