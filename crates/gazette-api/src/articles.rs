//! Handlers for `/articles` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/articles` | Staff; optional `status`, `author_id`, `edition_id`, `limit`, `offset` |
//! | `POST`   | `/articles` | Body: [`NewArticle`]; returns 201 + the DRAFT |
//! | `GET`    | `/articles/{id}` | Staff; 404 if not found |
//! | `PATCH`  | `/articles/{id}` | Body: [`ArticleChanges`] |
//! | `DELETE` | `/articles/{id}` | The `delete` transition; returns 204 |
//! | `POST`   | `/articles/{id}/transitions` | Body: [`TransitionBody`] |
//! | `GET`    | `/articles/{id}/reviews` | Staff; review notes in commit order |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use gazette_core::{
  article::{Article, ArticleChanges, ArticleQuery, NewArticle},
  review::{Highlight, ReviewNote},
  store::EditorialStore,
  workflow::{Payload, Transition, TransitionOutcome},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  actor::CurrentActor,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /articles[?status=under_review][&author_id=..][&edition_id=..][&limit=..][&offset=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  actor: CurrentActor,
  Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, ApiError>
where
  S: EditorialStore,
{
  actor.require_staff()?;
  let articles = store.list_articles(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(articles))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /articles`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewArticle>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EditorialStore,
{
  let article = store
    .create_article(actor, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(article)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /articles/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  actor: CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError>
where
  S: EditorialStore,
{
  actor.require_staff()?;
  let article = store
    .get_article(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| gazette_core::Error::not_found("article", id))?;
  Ok(Json(article))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /articles/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(changes): Json<ArticleChanges>,
) -> Result<Json<Article>, ApiError>
where
  S: EditorialStore,
{
  let article = store
    .update_article(id, actor, changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(article))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /articles/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EditorialStore,
{
  store.delete_article(id, actor).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Transitions ─────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /articles/{id}/transitions`.
///
/// ```json
/// {"transition": "reject", "note": "fix intro", "highlights": [{"selected_text": "..."}]}
/// ```
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
  pub transition: Transition,
  #[serde(default)]
  pub note:       Option<String>,
  #[serde(default)]
  pub highlights: Vec<Highlight>,
  #[serde(default)]
  pub changes:    Option<ArticleChanges>,
}

impl TransitionBody {
  pub fn into_parts(self) -> (Transition, Payload) {
    let payload = Payload { note: self.note, highlights: self.highlights, changes: self.changes };
    (self.transition, payload)
  }
}

/// `POST /articles/{id}/transitions`
pub async fn transition<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<TransitionBody>,
) -> Result<Json<TransitionOutcome>, ApiError>
where
  S: EditorialStore,
{
  let (transition, payload) = body.into_parts();
  let outcome = store
    .apply_transition(id, transition, actor, payload)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}

// ─── Review notes ────────────────────────────────────────────────────────────

/// `GET /articles/{id}/reviews`
pub async fn reviews<S>(
  State(store): State<Arc<S>>,
  actor: CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReviewNote>>, ApiError>
where
  S: EditorialStore,
{
  actor.require_staff()?;
  let notes = store.list_review_notes(id).await.map_err(ApiError::from_store)?;
  Ok(Json(notes))
}
