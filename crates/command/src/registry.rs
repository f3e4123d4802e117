//! Named menu definitions.
//!
//! Backs the `Menu` argument kind and the persistence collaborator:
//! window shapes are serialized/deserialized as JSON, with icon keys
//! resolved back to icons on load.

use std::collections::HashMap;

use parking_lot::RwLock;

use virtmenu_engine::{Icon, WindowDef};
use virtmenu_protocol::WindowShape;

/// Thread-safe store of named window definitions.
#[derive(Default)]
pub struct MenuRegistry {
    menus: RwLock<HashMap<String, WindowDef>>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the one it replaced, if any.
    pub fn insert(&self, name: impl Into<String>, def: WindowDef) -> Option<WindowDef> {
        self.menus.write().insert(name.into(), def)
    }

    pub fn remove(&self, name: &str) -> Option<WindowDef> {
        self.menus.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<WindowDef> {
        self.menus.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.menus.read().contains_key(name)
    }

    /// Registered menu names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.menus.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Loads a definition from a serialized [`WindowShape`], resolving
    /// each slot's icon key through `resolve`.
    pub fn load_json(
        &self,
        name: impl Into<String>,
        json: &str,
        resolve: impl Fn(&str) -> Option<Icon>,
    ) -> Result<(), serde_json::Error> {
        let shape: WindowShape = serde_json::from_str(json)?;
        self.insert(name, WindowDef::from_shape(&shape, resolve));
        Ok(())
    }

    /// Serializes a registered definition's static shape.
    pub fn export_json(&self, name: &str) -> Result<Option<String>, serde_json::Error> {
        match self.get(name) {
            Some(def) => Ok(Some(serde_json::to_string(&def.shape())?)),
            None => Ok(None),
        }
    }
}
