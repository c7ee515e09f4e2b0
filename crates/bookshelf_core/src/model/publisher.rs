//! Publisher entity.
//!
//! Leaf of the catalog graph: referenced by books, references nothing.

use super::PublisherId;
use serde::{Deserialize, Serialize};

/// Catalog publisher record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub(crate) id: Option<PublisherId>,
    pub(crate) name: Option<String>,
}

impl Publisher {
    /// Creates an unsaved publisher with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Option<PublisherId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}
