//! Session store — in-memory map from live connection to conversation state.
//!
//! Sessions live exactly as long as their connection; nothing is persisted.

pub mod store;

pub use store::SessionStore;
