//! Statements against the `editions` table.

use gazette_core::edition::Edition;
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{EDITION_COLUMNS, RawEdition, encode_covers, encode_date, encode_dt, encode_uuid},
};

/// Newest publish date first; numbered editions before unnumbered ones on the
/// same day.
const NEWEST_FIRST: &str = "ORDER BY publish_date DESC, edition_number DESC, created_at DESC";

pub fn load(conn: &Connection, edition_id: Uuid) -> Result<Option<Edition>> {
  let raw = conn
    .query_row(
      &format!("SELECT {EDITION_COLUMNS} FROM editions WHERE edition_id = ?1"),
      params![encode_uuid(edition_id)],
      RawEdition::from_row,
    )
    .optional()?;
  raw.map(RawEdition::into_edition).transpose()
}

pub fn require(conn: &Connection, edition_id: Uuid) -> Result<Edition> {
  load(conn, edition_id)?
    .ok_or_else(|| gazette_core::Error::not_found("edition", edition_id).into())
}

/// Fail with `NotFound` unless the edition exists.
pub fn ensure_exists(conn: &Connection, edition_id: Uuid) -> Result<()> {
  let exists: bool = conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM editions WHERE edition_id = ?1)",
    params![encode_uuid(edition_id)],
    |r| r.get(0),
  )?;
  if exists {
    Ok(())
  } else {
    Err(gazette_core::Error::not_found("edition", edition_id).into())
  }
}

pub fn insert(conn: &Connection, e: &Edition) -> Result<()> {
  conn.execute(
    &format!("INSERT INTO editions ({EDITION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
    params![
      encode_uuid(e.id),
      e.title,
      e.description,
      encode_date(e.publish_date),
      e.edition_number,
      e.is_published,
      encode_covers(&e.cover_images)?,
      encode_dt(e.created_at),
      encode_dt(e.updated_at),
    ],
  )?;
  Ok(())
}

pub fn update(conn: &Connection, e: &Edition) -> Result<()> {
  conn.execute(
    "UPDATE editions SET
       title = ?2, description = ?3, publish_date = ?4, edition_number = ?5,
       is_published = ?6, cover_images = ?7, updated_at = ?8
     WHERE edition_id = ?1",
    params![
      encode_uuid(e.id),
      e.title,
      e.description,
      encode_date(e.publish_date),
      e.edition_number,
      e.is_published,
      encode_covers(&e.cover_images)?,
      encode_dt(e.updated_at),
    ],
  )?;
  Ok(())
}

pub fn delete(conn: &Connection, edition_id: Uuid) -> Result<()> {
  conn.execute(
    "DELETE FROM editions WHERE edition_id = ?1",
    params![encode_uuid(edition_id)],
  )?;
  Ok(())
}

pub fn list(conn: &Connection, published_only: bool) -> Result<Vec<Edition>> {
  let filter = if published_only { "WHERE is_published = 1" } else { "" };
  let mut stmt = conn.prepare(&format!("SELECT {EDITION_COLUMNS} FROM editions {filter} {NEWEST_FIRST}"))?;
  let raws = stmt
    .query_map([], RawEdition::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawEdition::into_edition).collect()
}
