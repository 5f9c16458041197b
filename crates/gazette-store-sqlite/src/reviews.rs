//! The append-only `review_notes` log.
//!
//! No update or delete exists here; the schema also refuses both with
//! triggers.

use chrono::{DateTime, Utc};
use gazette_core::review::{NewReviewNote, ReviewNote};
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{REVIEW_COLUMNS, RawReviewNote, encode_decision, encode_dt, encode_highlights, encode_uuid},
};

/// Append a decision. Only called inside the transaction that applies the
/// approve or reject transition which produced it.
pub fn record_decision(
  conn: &Connection,
  input: NewReviewNote,
  now: DateTime<Utc>,
) -> Result<ReviewNote> {
  let note = input.into_note(now);
  conn.execute(
    &format!("INSERT INTO review_notes ({REVIEW_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
    params![
      encode_uuid(note.id),
      encode_uuid(note.article_id),
      encode_uuid(note.reviewer_id),
      encode_decision(note.decision),
      note.note,
      encode_highlights(&note.highlights)?,
      encode_dt(note.created_at),
    ],
  )?;
  Ok(note)
}

/// Notes for one article in commit order.
pub fn list_for_article(conn: &Connection, article_id: Uuid) -> Result<Vec<ReviewNote>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {REVIEW_COLUMNS} FROM review_notes WHERE article_id = ?1 ORDER BY seq ASC"
  ))?;
  let raws = stmt
    .query_map(params![encode_uuid(article_id)], RawReviewNote::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawReviewNote::into_note).collect()
}

pub fn exists_for_article(conn: &Connection, article_id: Uuid) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM review_notes WHERE article_id = ?1)",
    params![encode_uuid(article_id)],
    |r| r.get(0),
  )?)
}
