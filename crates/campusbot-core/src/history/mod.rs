//! Session history lifecycle.
//!
//! - `store`: the `HistoryStore` port implemented by the infra layer
//! - `adapter`: folds every store outcome into found/absent and saved/not saved
//! - `session_id`: local, collision-resistant session identifiers
//! - `base`: seed conversation filtering

pub mod adapter;
pub mod base;
pub mod session_id;
pub mod store;
