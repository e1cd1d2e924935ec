use screen_core::OperationDef;
use shared::{domain::ScreenId, error::UnknownScreen};
use thiserror::Error;

use crate::{bus, combining, creating, errors, filtering, transforming};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("screen {0} is already registered")]
    Duplicate(ScreenId),
    #[error("screen {0} has no registered operation")]
    Unregistered(ScreenId),
    #[error(transparent)]
    UnknownScreen(#[from] UnknownScreen),
}

/// Ordered set of operation definitions, at most one per screen.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    definitions: Vec<OperationDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in demonstration, in catalog order.
    pub fn builtin() -> Self {
        let mut definitions = [
            creating::DEFINITIONS,
            transforming::DEFINITIONS,
            filtering::DEFINITIONS,
            combining::DEFINITIONS,
            errors::DEFINITIONS,
            bus::DEFINITIONS,
        ]
        .concat();
        definitions.sort_by_key(|def| catalog_position(def.id));
        Self { definitions }
    }

    pub fn register(&mut self, definition: OperationDef) -> Result<(), RegistryError> {
        if self.contains(definition.id) {
            return Err(RegistryError::Duplicate(definition.id));
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.definitions.iter().any(|def| def.id == id)
    }

    pub fn get(&self, id: ScreenId) -> Result<&OperationDef, RegistryError> {
        self.definitions
            .iter()
            .find(|def| def.id == id)
            .ok_or(RegistryError::Unregistered(id))
    }

    /// Looks a definition up by screen name, case-insensitively.
    pub fn find(&self, name: &str) -> Result<&OperationDef, RegistryError> {
        let id = ScreenId::from_name(name)?;
        self.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDef> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn catalog_position(id: ScreenId) -> usize {
    ScreenId::ALL
        .iter()
        .position(|candidate| *candidate == id)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
