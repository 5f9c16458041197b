//! Statements against the `articles` table.
//!
//! Every function here runs on the connection thread, usually inside a write
//! transaction opened by [`crate::store`].

use gazette_core::article::{Article, ArticleQuery, Status};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{ARTICLE_COLUMNS, RawArticle, encode_dt, encode_format, encode_status, encode_uuid},
};

const DEFAULT_LIMIT: usize = 100;

pub fn load(conn: &Connection, article_id: Uuid) -> Result<Option<Article>> {
  let raw = conn
    .query_row(
      &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ?1"),
      params![encode_uuid(article_id)],
      RawArticle::from_row,
    )
    .optional()?;
  raw.map(RawArticle::into_article).transpose()
}

/// Load an article or fail with `NotFound`.
pub fn require(conn: &Connection, article_id: Uuid) -> Result<Article> {
  load(conn, article_id)?
    .ok_or_else(|| gazette_core::Error::not_found("article", article_id).into())
}

/// Fail with `Conflict` if any article other than `except` uses `slug`.
pub fn ensure_slug_free(conn: &Connection, slug: &str, except: Uuid) -> Result<()> {
  let taken: Option<String> = conn
    .query_row(
      "SELECT article_id FROM articles WHERE slug = ?1 AND article_id != ?2",
      params![slug, encode_uuid(except)],
      |r| r.get(0),
    )
    .optional()?;

  match taken {
    Some(other) => {
      tracing::debug!(slug, %other, "slug collision");
      Err(gazette_core::Error::conflict(format!("slug {slug:?} is already taken")).into())
    }
    None => Ok(()),
  }
}

pub fn insert(conn: &Connection, a: &Article) -> Result<()> {
  conn
    .execute(
      &format!(
        "INSERT INTO articles ({ARTICLE_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
      ),
      params![
        encode_uuid(a.id),
        a.title,
        a.slug,
        a.excerpt,
        a.body,
        encode_format(a.content_format),
        encode_status(a.status),
        encode_uuid(a.author_id),
        a.edition_id.map(encode_uuid),
        a.featured,
        a.published_at.map(encode_dt),
        encode_dt(a.created_at),
        encode_dt(a.updated_at),
      ],
    )
    .map_err(|e| unique_slug_violation(e, &a.slug))?;
  Ok(())
}

/// Write every mutable column of `a`, provided the stored status is still
/// `expected`. Returns `false` when the row had moved on (or vanished).
///
/// `published_at` is only ever filled in, never overwritten.
pub fn update_if_status(conn: &Connection, a: &Article, expected: Status) -> Result<bool> {
  let changed = conn
    .execute(
      "UPDATE articles SET
         title = ?2, slug = ?3, excerpt = ?4, body = ?5, content_format = ?6,
         status = ?7, edition_id = ?8, featured = ?9,
         published_at = COALESCE(published_at, ?10), updated_at = ?11
       WHERE article_id = ?1 AND status = ?12",
      params![
        encode_uuid(a.id),
        a.title,
        a.slug,
        a.excerpt,
        a.body,
        encode_format(a.content_format),
        encode_status(a.status),
        a.edition_id.map(encode_uuid),
        a.featured,
        a.published_at.map(encode_dt),
        encode_dt(a.updated_at),
        encode_status(expected),
      ],
    )
    .map_err(|e| unique_slug_violation(e, &a.slug))?;
  Ok(changed == 1)
}

pub fn delete_if_status(conn: &Connection, article_id: Uuid, expected: Status) -> Result<bool> {
  let removed = conn.execute(
    "DELETE FROM articles WHERE article_id = ?1 AND status = ?2",
    params![encode_uuid(article_id), encode_status(expected)],
  )?;
  Ok(removed == 1)
}

pub fn list(conn: &Connection, query: &ArticleQuery) -> Result<Vec<Article>> {
  let limit = query.limit.unwrap_or(DEFAULT_LIMIT) as i64;
  let offset = query.offset.unwrap_or(0) as i64;

  let mut stmt = conn.prepare(&format!(
    "SELECT {ARTICLE_COLUMNS} FROM articles
     WHERE (?1 IS NULL OR status = ?1)
       AND (?2 IS NULL OR author_id = ?2)
       AND (?3 IS NULL OR edition_id = ?3)
     ORDER BY updated_at DESC, created_at DESC
     LIMIT ?4 OFFSET ?5"
  ))?;
  let raws = stmt
    .query_map(
      params![
        query.status.map(encode_status),
        query.author_id.map(encode_uuid),
        query.edition_id.map(encode_uuid),
        limit,
        offset,
      ],
      RawArticle::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawArticle::into_article).collect()
}

/// PUBLISHED articles of the given editions, featured first, then oldest
/// publication first.
pub fn published_in_editions(conn: &Connection, edition_ids: &[Uuid]) -> Result<Vec<Article>> {
  if edition_ids.is_empty() {
    return Ok(Vec::new());
  }
  let placeholders = (1..=edition_ids.len())
    .map(|i| format!("?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!(
    "SELECT {ARTICLE_COLUMNS} FROM articles
     WHERE status = ?1 AND edition_id IN ({placeholders})
     ORDER BY featured DESC, published_at ASC, created_at ASC"
  );

  let mut values: Vec<String> = Vec::with_capacity(edition_ids.len() + 1);
  values.push(encode_status(Status::Published).to_owned());
  values.extend(edition_ids.iter().copied().map(encode_uuid));

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params_from_iter(values.iter()), RawArticle::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawArticle::into_article).collect()
}

pub fn count_in_edition(conn: &Connection, edition_id: Uuid) -> Result<i64> {
  Ok(conn.query_row(
    "SELECT COUNT(*) FROM articles WHERE edition_id = ?1",
    params![encode_uuid(edition_id)],
    |r| r.get(0),
  )?)
}

/// Map a UNIQUE violation on `slug` to a conflict; the in-transaction check
/// catches the common case, this catches writers on other connections.
fn unique_slug_violation(e: rusqlite::Error, slug: &str) -> crate::Error {
  match &e {
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      gazette_core::Error::conflict(format!("slug {slug:?} is already taken")).into()
    }
    _ => e.into(),
  }
}
