//! Key-value storage for collected products and settings
//!
//! The host owns the real store; this crate only needs `get`/`set`/`remove`
//! of JSON values. [`MemoryStore`] backs tests and embedders without one.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::{ProductDraft, SelectionDraft};
use crate::error::{Error, Result};

const PRODUCTS_KEY: &str = "products";
const LAST_SELECTION_KEY: &str = "lastSelection";
const SETTINGS_KEYS: &[&str] = &["exportFormat", "apiEndpoint", "apiKey", "enableDatabase"];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read `key` as `T`, treating a missing or null entry as absent.
fn read_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::Storage(format!("malformed \"{key}\" entry: {e}"))),
    }
}

/// The append-only list of collected products plus the selection stash.
pub struct ProductCollection<'s, S: KeyValueStore> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore> ProductCollection<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<ProductDraft>> {
        Ok(read_typed(&*self.store, PRODUCTS_KEY)?.unwrap_or_default())
    }

    /// Append one product; returns the new count.
    pub fn add(&mut self, product: ProductDraft) -> Result<usize> {
        let mut products = self.list()?;
        products.push(product);
        let count = products.len();
        self.store.set(PRODUCTS_KEY, serde_json::to_value(products)?)?;
        tracing::debug!(count, "product stored");
        Ok(count)
    }

    pub fn count(&self) -> Result<usize> {
        self.list().map(|products| products.len())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.set(PRODUCTS_KEY, Value::Array(Vec::new()))
    }

    /// Keep a parsed selection until the manual-entry form picks it up.
    pub fn stash_selection(&mut self, selection: &SelectionDraft) -> Result<()> {
        self.store
            .set(LAST_SELECTION_KEY, serde_json::to_value(selection)?)
    }

    /// Remove and return the stashed selection.
    pub fn take_selection(&mut self) -> Result<Option<SelectionDraft>> {
        let selection = read_typed(&*self.store, LAST_SELECTION_KEY)?;
        if selection.is_some() {
            self.store.remove(LAST_SELECTION_KEY)?;
        }
        Ok(selection)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// User settings, stored one key per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub export_format: ExportFormat,
    pub api_endpoint: String,
    pub api_key: String,
    pub enable_database: bool,
}

impl Settings {
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let mut fields = serde_json::Map::new();
        for key in SETTINGS_KEYS {
            if let Some(value) = store.get(key)?.filter(|v| !v.is_null()) {
                fields.insert((*key).to_string(), value);
            }
        }
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| Error::Storage(format!("malformed settings: {e}")))
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(Error::Storage("settings did not serialize to an object".into()));
        };
        for (key, value) in fields {
            store.set(&key, value)?;
        }
        Ok(())
    }

    /// Endpoint and key are both filled in.
    pub fn has_api_credentials(&self) -> bool {
        !self.api_endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}
