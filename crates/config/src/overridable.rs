//! Factory defaults plus user overrides
//!
//! An `OverridableSet` pairs an immutable factory map with the current
//! working map. `current` always holds every factory key. Only entries that
//! differ from the factory are written to disk, so new factory defaults take
//! effect on upgrade unless the user explicitly overrode them.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use crate::error::ConfigError;
use crate::persistence::{read_json, remove_file, write_json_atomic};

/// Whether keys outside the factory set are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Only factory keys; unknown persisted keys are dropped on load
    #[default]
    Closed,
    /// User keys are kept (page references, window positions)
    Open,
}

/// Receiver for `OverridableSet::apply`, e.g. the toolkit theme or menu bar
pub trait ApplyTarget<V> {
    fn apply(&mut self, id: &str, value: &V);
}

#[derive(Debug, Clone)]
pub struct OverridableSet<V> {
    factory: Arc<BTreeMap<String, V>>,
    current: BTreeMap<String, V>,
    policy: KeyPolicy,
}

impl<V: Clone + PartialEq> OverridableSet<V> {
    /// Closed set with `current` equal to the factory
    pub fn new(factory: BTreeMap<String, V>) -> Self {
        Self::shared(Arc::new(factory), KeyPolicy::Closed)
    }

    /// Open set with `current` equal to the factory
    pub fn open(factory: BTreeMap<String, V>) -> Self {
        Self::shared(Arc::new(factory), KeyPolicy::Open)
    }

    /// Set over a factory map shared with other sets
    pub fn shared(factory: Arc<BTreeMap<String, V>>, policy: KeyPolicy) -> Self {
        let current = (*factory).clone();
        Self {
            factory,
            current,
            policy,
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    pub fn factory(&self) -> &BTreeMap<String, V> {
        &self.factory
    }

    pub fn current(&self) -> &BTreeMap<String, V> {
        &self.current
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.current.get(id)
    }

    pub fn factory_value(&self, id: &str) -> Option<&V> {
        self.factory.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.current.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.current.iter()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Rebuild `current` from the factory plus persisted overrides.
    ///
    /// Factory keys missing from `persisted` take the factory value. Keys
    /// outside the factory are dropped for closed sets.
    pub fn merge(&mut self, persisted: BTreeMap<String, V>) {
        self.current = (*self.factory).clone();
        for (id, value) in persisted {
            if self.policy == KeyPolicy::Open || self.factory.contains_key(&id) {
                self.current.insert(id, value);
            } else {
                log::debug!("dropping unknown setting '{id}'");
            }
        }
    }

    /// Factory set with `persisted` merged in
    pub fn with_overrides(mut self, persisted: BTreeMap<String, V>) -> Self {
        self.merge(persisted);
        self
    }

    /// Change one value. Closed sets reject keys outside the factory.
    pub fn set(&mut self, id: &str, value: V) -> Result<(), ConfigError> {
        if self.policy == KeyPolicy::Closed && !self.factory.contains_key(id) {
            return Err(ConfigError::UnknownKey(id.to_string()));
        }
        self.current.insert(id.to_string(), value);
        Ok(())
    }

    /// Remove a user key from an open set. Factory keys cannot be removed,
    /// only reset.
    pub fn remove(&mut self, id: &str) -> Option<V> {
        if self.factory.contains_key(id) {
            return None;
        }
        self.current.remove(id)
    }

    /// `current = factory`
    pub fn reset(&mut self) {
        self.current = (*self.factory).clone();
    }

    /// Put one key back to its factory value (or drop it, for a user key).
    /// Returns whether anything changed.
    pub fn reset_one(&mut self, id: &str) -> bool {
        match self.factory.get(id) {
            Some(factory) => {
                if self.current.get(id) == Some(factory) {
                    return false;
                }
                self.current.insert(id.to_string(), factory.clone());
                true
            }
            None => self.current.remove(id).is_some(),
        }
    }

    /// Whether `id` differs from its factory value
    pub fn is_modified(&self, id: &str) -> bool {
        match self.current.get(id) {
            Some(value) => self.factory.get(id) != Some(value),
            None => false,
        }
    }

    /// True when nothing would be written on save
    pub fn is_default(&self) -> bool {
        self.overrides_iter().next().is_none()
    }

    fn overrides_iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.current
            .iter()
            .filter(move |(id, value)| self.factory.get(id.as_str()) != Some(*value))
    }

    /// Entries that differ from the factory; what gets persisted
    pub fn overrides(&self) -> BTreeMap<String, V> {
        self.overrides_iter()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }

    /// Push every current value into the live UI state
    pub fn apply(&self, target: &mut impl ApplyTarget<V>) {
        for (id, value) in &self.current {
            target.apply(id, value);
        }
    }
}

impl<V: Clone + PartialEq + Serialize> OverridableSet<V> {
    /// Pretty JSON of the overrides only
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    /// Write the overrides to `path`. An all-default set removes the file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if self.is_default() {
            return remove_file(path);
        }
        write_json_atomic(path, self)
    }
}

impl<V: Clone + PartialEq + DeserializeOwned> OverridableSet<V> {
    /// Factory set merged with the file at `path`.
    ///
    /// A missing file gives the pure factory set. An unreadable or malformed
    /// file is ignored as a whole; the set falls back to the factory and the
    /// error is handed back for reporting.
    pub fn load(
        factory: Arc<BTreeMap<String, V>>,
        policy: KeyPolicy,
        path: &Path,
    ) -> (Self, Option<ConfigError>) {
        let mut set = Self::shared(factory, policy);
        match read_json::<BTreeMap<String, V>>(path) {
            Ok(Some(persisted)) => {
                set.merge(persisted);
                (set, None)
            }
            Ok(None) => (set, None),
            Err(e) => {
                log::warn!("ignoring settings file: {e}");
                (set, Some(e))
            }
        }
    }

    /// Re-read `path` into an existing set. On error the current values are
    /// left untouched.
    pub fn reload(&mut self, path: &Path) -> Result<(), ConfigError> {
        match read_json::<BTreeMap<String, V>>(path)? {
            Some(persisted) => self.merge(persisted),
            None => self.reset(),
        }
        Ok(())
    }

    /// Merge overrides from a JSON string. Malformed input changes nothing.
    pub fn merge_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let persisted: BTreeMap<String, V> = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: Default::default(),
            message: e.to_string(),
        })?;
        self.merge(persisted);
        Ok(())
    }
}

/// Serializes as the override map only
impl<V: Clone + PartialEq + Serialize> Serialize for OverridableSet<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.overrides_iter())
    }
}
