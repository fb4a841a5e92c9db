//! Saved selection records and persistence errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpError;
use crate::region::{Code, Level};

/// A named selection stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSelection {
    pub id: u64,
    pub name: String,
    pub level: Level,
    #[serde(default)]
    pub items: Vec<Code>,
}

/// Request body for creating a saved selection.
#[derive(Debug, Serialize)]
pub struct NewSelection<'a> {
    pub name: &'a str,
    pub level: Level,
    pub items: &'a [Code],
}

/// Errors from the persistence backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// Save attempted with a blank name; nothing was sent.
    #[error("Selection name must not be empty")]
    EmptyName,

    /// No backend URL configured.
    #[error("No backend configured")]
    NotConfigured,

    #[error(transparent)]
    Http(#[from] HttpError),

    /// Backend answered with something other than the expected JSON.
    #[error("Unexpected backend response: {0}")]
    Json(String),

    /// The save went through but the list could not be reloaded.
    #[error("Saved, but refreshing the list failed: {0}")]
    RefreshFailed(String),
}
