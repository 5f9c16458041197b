//! Handlers for `/editions`, the staff view of editions.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/editions` | Staff; every edition, newest first |
//! | `POST`   | `/editions` | Body: [`NewEdition`]; returns 201 |
//! | `GET`    | `/editions/{id}` | Staff; 404 if not found |
//! | `PATCH`  | `/editions/{id}` | Body: [`EditionChanges`]; flips `is_published` too |
//! | `DELETE` | `/editions/{id}` | 409 while articles reference it |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use gazette_core::{
  edition::{Edition, EditionChanges, NewEdition},
  store::EditorialStore,
};
use uuid::Uuid;

use crate::{
  actor::CurrentActor,
  error::ApiError,
  extract::{Json, Path},
};

/// `GET /editions`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  actor: CurrentActor,
) -> Result<Json<Vec<Edition>>, ApiError>
where
  S: EditorialStore,
{
  actor.require_staff()?;
  let editions = store.list_editions().await.map_err(ApiError::from_store)?;
  Ok(Json(editions))
}

/// `POST /editions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewEdition>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EditorialStore,
{
  let edition = store
    .create_edition(actor, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(edition)))
}

/// `GET /editions/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  actor: CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Edition>, ApiError>
where
  S: EditorialStore,
{
  actor.require_staff()?;
  let edition = store
    .get_edition(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| gazette_core::Error::not_found("edition", id))?;
  Ok(Json(edition))
}

/// `PATCH /editions/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(changes): Json<EditionChanges>,
) -> Result<Json<Edition>, ApiError>
where
  S: EditorialStore,
{
  let edition = store
    .update_edition(id, actor, changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(edition))
}

/// `DELETE /editions/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EditorialStore,
{
  store.delete_edition(id, actor).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
