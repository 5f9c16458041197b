//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings at microsecond precision (so they sort as
//! text), calendar dates are `YYYY-MM-DD`, enums use
//! their `snake_case` strum names and sequences are compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use gazette_core::{
  article::{Article, ContentFormat, Status},
  edition::Edition,
  review::{Decision, Highlight, ReviewNote},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn encode_status(s: Status) -> &'static str { s.into() }

pub fn encode_format(f: ContentFormat) -> &'static str { f.into() }

pub fn encode_decision(d: Decision) -> &'static str { d.into() }

/// Parse any strum-backed enum column.
pub fn decode_enum<T: FromStr>(column: &str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::Decode(format!("unknown {column}: {s:?}")))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_highlights(h: &[Highlight]) -> Result<String> { Ok(serde_json::to_string(h)?) }

pub fn decode_highlights(s: &str) -> Result<Vec<Highlight>> { Ok(serde_json::from_str(s)?) }

pub fn encode_covers(c: &[String]) -> Result<String> { Ok(serde_json::to_string(c)?) }

pub fn decode_covers(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawArticle::from_row`].
pub const ARTICLE_COLUMNS: &str = "article_id, title, slug, excerpt, body, content_format, \
   status, author_id, edition_id, featured, published_at, created_at, updated_at";

/// Raw values read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:     String,
  pub title:          String,
  pub slug:           String,
  pub excerpt:        String,
  pub body:           String,
  pub content_format: String,
  pub status:         String,
  pub author_id:      String,
  pub edition_id:     Option<String>,
  pub featured:       bool,
  pub published_at:   Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawArticle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:     row.get(0)?,
      title:          row.get(1)?,
      slug:           row.get(2)?,
      excerpt:        row.get(3)?,
      body:           row.get(4)?,
      content_format: row.get(5)?,
      status:         row.get(6)?,
      author_id:      row.get(7)?,
      edition_id:     row.get(8)?,
      featured:       row.get(9)?,
      published_at:   row.get(10)?,
      created_at:     row.get(11)?,
      updated_at:     row.get(12)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:             decode_uuid(&self.article_id)?,
      title:          self.title,
      slug:           self.slug,
      excerpt:        self.excerpt,
      body:           self.body,
      content_format: decode_enum::<ContentFormat>("content format", &self.content_format)?,
      status:         decode_enum::<Status>("status", &self.status)?,
      author_id:      decode_uuid(&self.author_id)?,
      edition_id:     self.edition_id.as_deref().map(decode_uuid).transpose()?,
      featured:       self.featured,
      published_at:   self.published_at.as_deref().map(decode_dt).transpose()?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawReviewNote::from_row`].
pub const REVIEW_COLUMNS: &str =
  "review_id, article_id, reviewer_id, decision, note, highlights, created_at";

pub struct RawReviewNote {
  pub review_id:   String,
  pub article_id:  String,
  pub reviewer_id: String,
  pub decision:    String,
  pub note:        String,
  pub highlights:  String,
  pub created_at:  String,
}

impl RawReviewNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:   row.get(0)?,
      article_id:  row.get(1)?,
      reviewer_id: row.get(2)?,
      decision:    row.get(3)?,
      note:        row.get(4)?,
      highlights:  row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_note(self) -> Result<ReviewNote> {
    Ok(ReviewNote {
      id:          decode_uuid(&self.review_id)?,
      article_id:  decode_uuid(&self.article_id)?,
      reviewer_id: decode_uuid(&self.reviewer_id)?,
      decision:    decode_enum::<Decision>("decision", &self.decision)?,
      note:        self.note,
      highlights:  decode_highlights(&self.highlights)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawEdition::from_row`].
pub const EDITION_COLUMNS: &str = "edition_id, title, description, publish_date, \
   edition_number, is_published, cover_images, created_at, updated_at";

pub struct RawEdition {
  pub edition_id:     String,
  pub title:          String,
  pub description:    String,
  pub publish_date:   String,
  pub edition_number: Option<i32>,
  pub is_published:   bool,
  pub cover_images:   String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawEdition {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      edition_id:     row.get(0)?,
      title:          row.get(1)?,
      description:    row.get(2)?,
      publish_date:   row.get(3)?,
      edition_number: row.get(4)?,
      is_published:   row.get(5)?,
      cover_images:   row.get(6)?,
      created_at:     row.get(7)?,
      updated_at:     row.get(8)?,
    })
  }

  pub fn into_edition(self) -> Result<Edition> {
    Ok(Edition {
      id:             decode_uuid(&self.edition_id)?,
      title:          self.title,
      description:    self.description,
      publish_date:   decode_date(&self.publish_date)?,
      edition_number: self.edition_number,
      is_published:   self.is_published,
      cover_images:   decode_covers(&self.cover_images)?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}
