//! SQLite backend for the Gazette editorial store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each store operation is a single
//! closure on that thread, so a write transaction either commits or rolls
//! back as a whole even if the calling future is dropped.

mod articles;
mod editions;
mod encode;
mod reviews;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, StoreOptions};

#[cfg(test)]
mod tests;
