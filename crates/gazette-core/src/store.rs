//! The `EditorialStore` trait.
//!
//! Implemented by storage backends (e.g. `gazette-store-sqlite`). Higher
//! layers (`gazette-api`) depend on this abstraction, not on any concrete
//! backend.
//!
//! Every mutating method is one atomic unit of work: either all of its writes
//! commit or none do. Backends never retry a workflow failure; only transient
//! storage failures may be retried, at the storage boundary.

use std::future::Future;

use uuid::Uuid;

use crate::{
  WorkflowFailure,
  actor::Actor,
  article::{Article, ArticleChanges, ArticleQuery, NewArticle},
  edition::{Edition, EditionChanges, NewEdition, PublishedEdition},
  review::ReviewNote,
  workflow::{Payload, Transition, TransitionOutcome},
};

/// Abstraction over a Gazette editorial store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EditorialStore: Send + Sync {
  type Error: std::error::Error + WorkflowFailure + Send + Sync + 'static;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Create a DRAFT owned by `actor`. A taken slug is a conflict.
  fn create_article(
    &self,
    actor: Actor,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  /// Change fields of a DRAFT or REJECTED article without moving its status.
  fn update_article(
    &self,
    article_id: Uuid,
    actor: Actor,
    changes: ArticleChanges,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  /// Retrieve an article by id. Returns `None` if not found.
  fn get_article(
    &self,
    article_id: Uuid,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Staff listing, newest `updated_at` first.
  fn list_articles<'a>(
    &'a self,
    query: &'a ArticleQuery,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + 'a;

  /// Remove a DRAFT article; the `delete` transition.
  fn delete_article(
    &self,
    article_id: Uuid,
    actor: Actor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Workflow ──────────────────────────────────────────────────────────

  /// Apply `transition` and, for reviews, record the note in the same
  /// transaction.
  fn apply_transition(
    &self,
    article_id: Uuid,
    transition: Transition,
    actor: Actor,
    payload: Payload,
  ) -> impl Future<Output = Result<TransitionOutcome, Self::Error>> + Send + '_;

  /// All review notes for an article, oldest first in commit order.
  fn list_review_notes(
    &self,
    article_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ReviewNote>, Self::Error>> + Send + '_;

  // ── Editions ──────────────────────────────────────────────────────────

  fn create_edition(
    &self,
    actor: Actor,
    input: NewEdition,
  ) -> impl Future<Output = Result<Edition, Self::Error>> + Send + '_;

  fn update_edition(
    &self,
    edition_id: Uuid,
    actor: Actor,
    changes: EditionChanges,
  ) -> impl Future<Output = Result<Edition, Self::Error>> + Send + '_;

  fn get_edition(
    &self,
    edition_id: Uuid,
  ) -> impl Future<Output = Result<Option<Edition>, Self::Error>> + Send + '_;

  /// Every edition regardless of its publish flag, newest first.
  fn list_editions(
    &self,
  ) -> impl Future<Output = Result<Vec<Edition>, Self::Error>> + Send + '_;

  /// Delete an edition. Refused with a conflict while articles reference it.
  fn delete_edition(
    &self,
    edition_id: Uuid,
    actor: Actor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reader view ───────────────────────────────────────────────────────

  /// Published editions, newest `publish_date` first, each carrying only its
  /// PUBLISHED articles.
  fn list_published_editions(
    &self,
  ) -> impl Future<Output = Result<Vec<PublishedEdition>, Self::Error>> + Send + '_;

  /// One edition as readers see it; `None` when missing or unpublished.
  fn get_published_edition(
    &self,
    edition_id: Uuid,
  ) -> impl Future<Output = Result<Option<PublishedEdition>, Self::Error>> + Send + '_;
}
