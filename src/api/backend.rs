use serde_json::Value;

use crate::models::Collection;

use super::error::ApiError;

/// The five REST verbs every collection supports. Bodies travel as raw JSON so
/// implementations stay object-safe; the typed helpers in `records` handle
/// (de)serialization on top.
pub trait Backend {
    /// `GET /{collection}`
    fn list(&self, collection: Collection) -> Result<Vec<Value>, ApiError>;

    /// `GET /{collection}/{id}`. A 404 surfaces as [`ApiError::NotFound`].
    fn get(&self, collection: Collection, id: &str) -> Result<Value, ApiError>;

    /// `POST /{collection}`. Returns the created row when the server echoes it.
    fn create(&self, collection: Collection, body: &Value) -> Result<Option<Value>, ApiError>;

    /// `PUT /{collection}/{id}`
    fn update(&self, collection: Collection, id: &str, body: &Value) -> Result<(), ApiError>;

    /// `DELETE /{collection}/{id}`
    fn delete(&self, collection: Collection, id: &str) -> Result<(), ApiError>;
}
