use thiserror::Error;

use crate::models::Collection;

/// Everything that can go wrong while talking to the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{} {id} not found", collection.singular())]
    NotFound { collection: Collection, id: String },

    #[error("server answered {status}{}", body_suffix(body))]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request url: {0}")]
    Url(String),

    #[error("cannot update a {} without an id", .0.singular())]
    MissingId(Collection),
}

impl ApiError {
    /// Whether the server reached a verdict against the request, as opposed to
    /// the request never completing. The school-records server reports unknown ids
    /// as 500, so lookups treat every rejection as "no such row".
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::NotFound { .. } | ApiError::Status { .. })
    }
}

fn body_suffix(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
