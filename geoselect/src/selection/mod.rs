//! Selection state: the single source of truth for chosen codes.
//!
//! [`SelectionStore`] is the plain data structure; [`SharedSelection`] is
//! the handle the rest of the engine holds.

mod shared;
mod store;

pub use shared::SharedSelection;
pub use store::{SelectionSnapshot, SelectionStore};
