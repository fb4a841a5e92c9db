//! Persistence of named selections through the REST backend.

mod client;
mod types;

pub use client::PersistenceClient;
pub use types::{NewSelection, PersistenceError, SavedSelection};
