//! Database models for the bakery back-office
//!
//! Re-exports models from the shared crate and adds backend-specific rows

use serde::de::DeserializeOwned;
use sqlx::FromRow;

pub use shared::models::*;

/// A record from one of the document tables (`orders`, `ingredients`)
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub data: serde_json::Value,
}

impl DocumentRow {
    /// Decode the document, filling in `id` from the row key when the body lacks one.
    ///
    /// Returns `None` for bodies that are not JSON objects or do not fit `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Option<T> {
        let mut data = self.data;
        let object = data.as_object_mut()?;
        let has_id = object
            .get("id")
            .and_then(|id| id.as_str())
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false);
        if !has_id {
            object.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        }
        match serde_json::from_value(data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping undecodable document {}: {}", self.id, e);
                None
            }
        }
    }
}
