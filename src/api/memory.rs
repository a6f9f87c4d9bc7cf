//! In-process stand-in for the REST server, used by unit tests. It follows the
//! school-records server's behaviour: ids and `createdAt` are assigned on create,
//! PUT merges the body into the stored row, DELETE of an unknown id succeeds.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::models::Collection;

use super::backend::Backend;
use super::error::ApiError;

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub(crate) method: &'static str,
    pub(crate) path: String,
    pub(crate) body: Option<Value>,
}

impl RecordedRequest {
    pub(crate) fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Default)]
struct State {
    rows: HashMap<Collection, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    failing: HashSet<(&'static str, Collection)>,
    next_id: u64,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: RefCell<State>,
}

impl MemoryBackend {
    /// Insert a row directly, bypassing the request log.
    pub(crate) fn seed(&self, collection: Collection, row: Value) {
        self.state
            .borrow_mut()
            .rows
            .entry(collection)
            .or_default()
            .push(row);
    }

    pub(crate) fn rows(&self, collection: Collection) -> Vec<Value> {
        self.state
            .borrow()
            .rows
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state.borrow().requests.clone()
    }

    pub(crate) fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::line).collect()
    }

    /// Make every `method` request against `collection` answer 500.
    pub(crate) fn fail_on(&self, method: &'static str, collection: Collection) {
        self.state.borrow_mut().failing.insert((method, collection));
    }

    fn record(
        &self,
        method: &'static str,
        collection: Collection,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        let path = match id {
            Some(id) => format!("/{}/{}", collection.path(), id),
            None => format!("/{}", collection.path()),
        };
        let mut state = self.state.borrow_mut();
        state.requests.push(RecordedRequest {
            method,
            path,
            body: body.cloned(),
        });
        if state.failing.contains(&(method, collection)) {
            return Err(ApiError::Status {
                status: 500,
                body: "{\"error\":\"injected failure\"}".into(),
            });
        }
        Ok(())
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl Backend for MemoryBackend {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, ApiError> {
        self.record("GET", collection, None, None)?;
        Ok(self.rows(collection))
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Value, ApiError> {
        self.record("GET", collection, Some(id), None)?;
        self.rows(collection)
            .into_iter()
            .find(|row| row_id(row) == Some(id))
            .ok_or_else(|| ApiError::NotFound {
                collection,
                id: id.to_string(),
            })
    }

    fn create(&self, collection: Collection, body: &Value) -> Result<Option<Value>, ApiError> {
        self.record("POST", collection, None, Some(body))?;
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let mut row = body.as_object().cloned().unwrap_or_else(Map::new);
        row.insert(
            "id".into(),
            Value::String(format!("{}-{}", collection.path(), state.next_id)),
        );
        row.insert(
            "createdAt".into(),
            Value::String("2024-05-01T09:00:00Z".into()),
        );
        let row = Value::Object(row);
        state
            .rows
            .entry(collection)
            .or_default()
            .push(row.clone());
        Ok(Some(row))
    }

    fn update(&self, collection: Collection, id: &str, body: &Value) -> Result<(), ApiError> {
        self.record("PUT", collection, Some(id), Some(body))?;
        let mut state = self.state.borrow_mut();
        let row = state
            .rows
            .entry(collection)
            .or_default()
            .iter_mut()
            .find(|row| row_id(row) == Some(id))
            .ok_or_else(|| ApiError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        if let (Some(target), Some(changes)) = (row.as_object_mut(), body.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), ApiError> {
        self.record("DELETE", collection, Some(id), None)?;
        self.state
            .borrow_mut()
            .rows
            .entry(collection)
            .or_default()
            .retain(|row| row_id(row) != Some(id));
        Ok(())
    }
}

/// Lets a test keep a handle on the backend it gives to the app.
impl Backend for Rc<MemoryBackend> {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, ApiError> {
        self.as_ref().list(collection)
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Value, ApiError> {
        self.as_ref().get(collection, id)
    }

    fn create(&self, collection: Collection, body: &Value) -> Result<Option<Value>, ApiError> {
        self.as_ref().create(collection, body)
    }

    fn update(&self, collection: Collection, id: &str, body: &Value) -> Result<(), ApiError> {
        self.as_ref().update(collection, id, body)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), ApiError> {
        self.as_ref().delete(collection, id)
    }
}
