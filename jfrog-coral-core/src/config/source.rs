//! Where configuration values come from.
//!
//! In dev mode the values live in the process environment (after `.env` has
//! been merged in); in executable mode an orchestrator may instead hand the
//! agent an options map. Both are read through [`EnvSource`].

use std::collections::HashMap;
use std::env;

pub trait EnvSource {
    /// Returns the raw value for `key`, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the trimmed value for `key`; blank values count as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// First non-empty value among `keys`, in order.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get_non_empty(key))
    }
}

/// Reads from `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Orchestrator-supplied option values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsMap {
    values: HashMap<String, String>,
}

impl OptionsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for OptionsMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for OptionsMap {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_unset() {
        let options = OptionsMap::new().with("A", "   ").with("B", " value ");
        assert_eq!(options.get_non_empty("A"), None);
        assert_eq!(options.get_non_empty("B").as_deref(), Some("value"));
    }

    #[test]
    fn first_of_respects_key_order() {
        let options = OptionsMap::new().with("API_KEY", "legacy").with("MODEL_API_KEY", "primary");
        assert_eq!(
            options.first_of(&["MODEL_API_KEY", "API_KEY"]).as_deref(),
            Some("primary")
        );
        let legacy_only: OptionsMap = [("API_KEY", "legacy")].into_iter().collect();
        assert_eq!(
            legacy_only.first_of(&["MODEL_API_KEY", "API_KEY"]).as_deref(),
            Some("legacy")
        );
    }
}
