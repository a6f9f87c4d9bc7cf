use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Collection;

use super::backend::Backend;
use super::error::ApiError;

/// Blocking HTTP client for the school-records REST API. Calls complete before
/// the event loop processes the next key, so responses can never land on a
/// page the user already left.
pub struct RestClient {
    http: Client,
    base: Url,
}

impl RestClient {
    /// Build a client rooted at `base`. A path on the base URL is kept, so
    /// `http://host/api` resolves collections beneath `/api/`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: with_trailing_slash(base),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn collection_url(&self, collection: Collection) -> Result<Url, ApiError> {
        self.base
            .join(collection.path())
            .map_err(|err| ApiError::Url(err.to_string()))
    }

    fn record_url(&self, collection: Collection, id: &str) -> Result<Url, ApiError> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot carry a path", self.base)))?
            .push(id);
        Ok(url)
    }

    /// Issue one request and turn non-2xx answers into [`ApiError::Status`].
    fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|err| {
            warn!(%method, %url, error = %err, "request did not complete");
            ApiError::from(err)
        })?;

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "request completed");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        warn!(%method, %url, status = status.as_u16(), "request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Backend for RestClient {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, ApiError> {
        let url = self.collection_url(collection)?;
        let response = self.send(Method::GET, url, None)?;
        match read_json(response)? {
            // The school-records server encodes an empty table as `null`.
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Ok(serde_json::from_value(other)?),
        }
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Value, ApiError> {
        let url = self.record_url(collection, id)?;
        let response = match self.send(Method::GET, url, None) {
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(ApiError::NotFound {
                    collection,
                    id: id.to_string(),
                })
            }
            other => other?,
        };
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn create(&self, collection: Collection, body: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.collection_url(collection)?;
        let response = self.send(Method::POST, url, Some(body))?;
        read_json(response)
    }

    fn update(&self, collection: Collection, id: &str, body: &Value) -> Result<(), ApiError> {
        let url = self.record_url(collection, id)?;
        self.send(Method::PUT, url, Some(body))?;
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), ApiError> {
        let url = self.record_url(collection, id)?;
        self.send(Method::DELETE, url, None)?;
        Ok(())
    }
}

/// Parse a response body, treating an empty body (204 and friends) as `None`.
fn read_json(response: Response) -> Result<Option<Value>, ApiError> {
    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
