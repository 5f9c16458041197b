//! Extractor for the acting [`Actor`].
//!
//! Authentication happens upstream; the identity layer forwards the caller as
//! two headers, `x-actor-id` (a UUID) and `x-actor-role` (a role name such as
//! `publisher`).

use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};
use gazette_core::{
  actor::{Actor, Role},
  permission,
};
use uuid::Uuid;

use crate::error::ApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The caller of the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
  parts
    .headers
    .get(name)
    .ok_or_else(|| ApiError::Unauthorized(format!("missing {name} header")))?
    .to_str()
    .map_err(|_| ApiError::Unauthorized(format!("{name} is not valid text")))
}

impl<S> FromRequestParts<S> for CurrentActor
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let id = Uuid::parse_str(header(parts, ACTOR_ID_HEADER)?)
      .map_err(|_| ApiError::Unauthorized(format!("{ACTOR_ID_HEADER} is not a UUID")))?;
    let role = header(parts, ACTOR_ROLE_HEADER)?;
    let role = Role::from_str(role)
      .map_err(|_| ApiError::Unauthorized(format!("unknown role {role:?}")))?;
    Ok(CurrentActor(Actor::new(id, role)))
  }
}

impl CurrentActor {
  /// Refuse callers outside editorial staff; used by the non-public reads.
  pub fn require_staff(&self) -> Result<Actor, ApiError> {
    if permission::can_view_workflow(self.0.role) {
      Ok(self.0)
    } else {
      Err(gazette_core::Error::forbidden(format!("{} may not view the editorial workflow", self.0.role)).into())
    }
  }
}
