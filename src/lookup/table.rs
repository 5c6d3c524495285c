//! Case-insensitive category lookup.

use crate::error::{DaisyError, Result};
use std::collections::HashMap;

/// Immutable mapping from category key to text.
///
/// Keys are trimmed and lower-cased on insert and lookup. Several keys may
/// share one text block.
#[derive(Debug, Clone)]
pub struct LookupTable {
    index: HashMap<String, usize>,
    texts: Vec<String>,
}

impl LookupTable {
    pub fn builder() -> LookupTableBuilder {
        LookupTableBuilder::default()
    }

    /// Text for `key`, if the key is known.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(&normalize(key))
            .map(|&i| self.texts[i].as_str())
    }
}

/// Builder for [`LookupTable`]. Duplicate keys are rejected by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct LookupTableBuilder {
    entries: Vec<(Vec<String>, String)>,
}

impl LookupTableBuilder {
    /// Map a single key to `text`.
    pub fn entry(self, key: &str, text: impl Into<String>) -> Self {
        self.aliases(&[key], text)
    }

    /// Map several keys to the same `text`.
    pub fn aliases(mut self, keys: &[&str], text: impl Into<String>) -> Self {
        self.entries
            .push((keys.iter().map(|k| normalize(k)).collect(), text.into()));
        self
    }

    pub fn build(self) -> Result<LookupTable> {
        let mut index = HashMap::new();
        let mut texts = Vec::with_capacity(self.entries.len());

        for (keys, text) in self.entries {
            let slot = texts.len();
            texts.push(text);
            for key in keys {
                if index.insert(key.clone(), slot).is_some() {
                    return Err(DaisyError::Config(format!(
                        "Duplicate lookup key: {}",
                        key
                    )));
                }
            }
        }

        Ok(LookupTable { index, texts })
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}
