use tracing::debug;

use crate::models::{Collection, Record};

use super::backend::Backend;
use super::error::ApiError;

/// Retrieve the whole collection for `T`. The server is the source of truth,
/// so pages replace their local copy with this result after every mutation.
pub fn fetch_all<T: Record>(backend: &dyn Backend) -> Result<Vec<T>, ApiError> {
    let rows = backend.list(T::COLLECTION)?;
    let records = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;
    debug!(collection = T::COLLECTION.path(), count = records.len(), "fetched records");
    Ok(records)
}

/// Look up one row by id, mapping a 404 to `None`.
pub fn fetch_one<T: Record>(backend: &dyn Backend, id: &str) -> Result<Option<T>, ApiError> {
    match backend.get(T::COLLECTION, id) {
        Ok(value) => Ok(Some(serde_json::from_value(value)?)),
        Err(ApiError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn create_record<T: Record>(backend: &dyn Backend, draft: &T) -> Result<(), ApiError> {
    let body = serde_json::to_value(draft)?;
    backend.create(T::COLLECTION, &body)?;
    Ok(())
}

pub fn update_record<T: Record>(backend: &dyn Backend, record: &T) -> Result<(), ApiError> {
    if record.id().is_empty() {
        return Err(ApiError::MissingId(T::COLLECTION));
    }
    let body = serde_json::to_value(record)?;
    backend.update(T::COLLECTION, record.id(), &body)
}

pub fn delete_record<T: Record>(backend: &dyn Backend, id: &str) -> Result<(), ApiError> {
    backend.delete(T::COLLECTION, id)
}

/// Existence check for reference fields: `GET /{collection}/{id}`. Any
/// rejection counts as missing; only transport failures are errors.
pub fn reference_exists(
    backend: &dyn Backend,
    collection: Collection,
    id: &str,
) -> Result<bool, ApiError> {
    match backend.get(collection, id) {
        Ok(_) => Ok(true),
        Err(err) if err.is_rejection() => {
            debug!(collection = collection.path(), id, error = %err, "reference not found");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
