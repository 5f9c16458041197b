//! The acting caller's identity and role, supplied by the identity layer on
//! every call. Never persisted by this subsystem.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of platform roles.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
  strum::EnumString,
  strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
  Customer,
  Editor,
  Publisher,
  Admin,
  SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub id:   Uuid,
  pub role: Role,
}

impl Actor {
  pub fn new(id: Uuid, role: Role) -> Self { Self { id, role } }

  pub fn is_super_admin(&self) -> bool { self.role == Role::SuperAdmin }
}
