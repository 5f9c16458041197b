//! JSON REST API for the Gazette editorial workflow.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gazette_core::store::EditorialStore`]. Authentication happens upstream;
//! the acting user arrives in the `x-actor-id` and `x-actor-role` headers (see
//! [`actor`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gazette_api::api_router(store.clone()))
//! ```

pub mod actor;
pub mod articles;
pub mod editions;
pub mod error;
pub mod extract;
pub mod published;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use gazette_core::store::EditorialStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EditorialStore + 'static,
{
  Router::new()
    // Articles and workflow
    .route("/articles", get(articles::list::<S>).post(articles::create::<S>))
    .route(
      "/articles/{id}",
      get(articles::get_one::<S>)
        .patch(articles::update::<S>)
        .delete(articles::delete::<S>),
    )
    .route("/articles/{id}/transitions", post(articles::transition::<S>))
    .route("/articles/{id}/reviews", get(articles::reviews::<S>))
    // Editions
    .route("/editions", get(editions::list::<S>).post(editions::create::<S>))
    .route(
      "/editions/{id}",
      get(editions::get_one::<S>)
        .patch(editions::update::<S>)
        .delete(editions::delete::<S>),
    )
    // Reader view
    .route("/published/editions", get(published::list::<S>))
    .route("/published/editions/{id}", get(published::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
