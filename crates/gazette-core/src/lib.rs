//! Core types and trait definitions for the Gazette editorial workflow.
//!
//! This crate is free of HTTP and database dependencies. Status transitions
//! are decided here as pure functions; storage backends apply the decisions
//! inside their own transactions.

pub mod actor;
pub mod article;
pub mod edition;
pub mod error;
pub mod permission;
pub mod review;
pub mod store;
pub mod workflow;

pub use error::{Error, ErrorKind, Result, WorkflowFailure};
