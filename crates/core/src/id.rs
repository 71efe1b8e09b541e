use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Document identity, serialized as `{entity}-{key}`. Entity names never
/// contain `-`, keys may, so decoding splits on the first separator only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentId {
    pub entity_name: String,
    pub key: String,
}

impl DocumentId {
    pub fn new(entity_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            key: key.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        match raw.split_once('-') {
            Some((entity_name, key)) if !entity_name.is_empty() && !key.is_empty() => {
                Ok(Self::new(entity_name, key))
            }
            _ => Err(SearchError::IdDecode(raw.to_string())),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}-{}", self.entity_name, self.key)
    }
}
