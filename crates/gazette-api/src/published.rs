//! Public reader endpoints. No actor headers are required.

use std::sync::Arc;

use axum::extract::State;
use gazette_core::{edition::PublishedEdition, store::EditorialStore};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path},
};

/// `GET /published/editions`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<PublishedEdition>>, ApiError>
where
  S: EditorialStore,
{
  let editions = store
    .list_published_editions()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(editions))
}

/// `GET /published/editions/{id}`; unpublished editions are reported as
/// missing.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PublishedEdition>, ApiError>
where
  S: EditorialStore,
{
  let edition = store
    .get_published_edition(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| gazette_core::Error::not_found("edition", id))?;
  Ok(Json(edition))
}
