//! The parsed configuration view the generator receives at `Start`, and the
//! `PipelineConfig` derived from it.
//!
//! Parsing the embedding application's actual configuration file format (TOML, a
//! custom format, environment variables, …) is out of scope for this crate; it only
//! needs a case-insensitive key/value lookup.

use std::collections::HashMap;

use crate::error::GeneratorError;

/// A parsed view into a section of the world's configuration. Keys are looked up
/// case-insensitively by the implementation; this crate never parses raw file bytes.
pub trait ConfigView {
    /// Look up a single string value for `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Look up a comma-separated list value for `key`, trimmed of surrounding
    /// whitespace on each element. Returns an empty vector if the key is absent.
    fn get_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            None => Vec::new(),
            Some(raw) => raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
        }
    }
}

/// A simple `HashMap`-backed [`ConfigView`], for tests and for callers with no config
/// file format of their own in place yet.
#[derive(Debug, Clone, Default)]
pub struct MapConfigView {
    entries: HashMap<String, String>,
}

impl MapConfigView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into().to_ascii_lowercase(), value.into());
        self
    }
}

impl ConfigView for MapConfigView {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_ascii_lowercase()).map(String::as_str)
    }
}

/// The resolved set of selectors and options the pipeline assembler consumes.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub biome_gen: String,
    pub height_gen: String,
    pub composition_gen: String,
    pub structures: Vec<String>,
    pub finishers: Vec<String>,
    pub seed: i64,
    pub high_water: usize,
}

/// Default high-water mark for the request queue overload policy, used when the
/// config view doesn't override it via `high_water`.
pub const DEFAULT_HIGH_WATER: usize = 64;

impl PipelineConfig {
    /// Read recognized options from a [`ConfigView`]. `biome_gen`, `height_gen`,
    /// `composition_gen` and `seed` are required; `structures`, `finishers` and
    /// `high_water` default to empty/the built-in constant when absent.
    pub fn from_view(view: &dyn ConfigView) -> Result<Self, GeneratorError> {
        let biome_gen = view.get("biome_gen")
            .ok_or_else(|| GeneratorError::InvalidConfig("missing required option biome_gen".into()))?
            .to_string();
        let height_gen = view.get("height_gen")
            .ok_or_else(|| GeneratorError::InvalidConfig("missing required option height_gen".into()))?
            .to_string();
        let composition_gen = view.get("composition_gen")
            .ok_or_else(|| GeneratorError::InvalidConfig("missing required option composition_gen".into()))?
            .to_string();
        let seed: i64 = view.get("seed")
            .ok_or_else(|| GeneratorError::InvalidConfig("missing required option seed".into()))?
            .parse()
            .map_err(|_| GeneratorError::InvalidConfig("seed is not a valid integer".into()))?;

        let high_water = match view.get("high_water") {
            None => DEFAULT_HIGH_WATER,
            Some(raw) => raw.parse()
                .map_err(|_| GeneratorError::InvalidConfig("high_water is not a valid integer".into()))?,
        };

        Ok(Self {
            biome_gen,
            height_gen,
            composition_gen,
            structures: view.get_list("structures"),
            finishers: view.get_list("finishers"),
            seed,
            high_water,
        })
    }
}
