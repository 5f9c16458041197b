//! The article: the entity moved through the editorial workflow.
//!
//! Lifecycle state is a single closed [`Status`]; there are no independent
//! `is_published`/`is_rejected` flags that could contradict one another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

const MAX_TITLE_LEN: usize = 300;
const MAX_SLUG_LEN: usize = 200;

// ─── Status ──────────────────────────────────────────────────────────────────

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
#[strum(serialize_all = "snake_case")]
pub enum Status {
  Draft,
  UnderReview,
  /// Representable but unreachable: approval publishes immediately.
  Approved,
  Published,
  Rejected,
  Archived,
}

impl Status {
  /// Whether the author may still change the article's fields.
  pub fn is_editable(self) -> bool { matches!(self, Self::Draft | Self::Rejected) }
}

// ─── Content format ──────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentFormat {
  #[default]
  Html,
  Markdown,
}

// ─── Article ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
  pub id:             Uuid,
  pub title:          String,
  pub slug:           String,
  pub excerpt:        String,
  pub body:           String,
  pub content_format: ContentFormat,
  pub status:         Status,
  /// The owning editor; never changes after creation.
  pub author_id:      Uuid,
  pub edition_id:     Option<Uuid>,
  pub featured:       bool,
  /// Set on the first transition into [`Status::Published`], then frozen.
  pub published_at:   Option<DateTime<Utc>>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Article {
  /// Build a fresh DRAFT owned by `author_id`.
  pub fn draft(author_id: Uuid, input: NewArticle, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      title: input.title.trim().to_owned(),
      slug: input.slug,
      excerpt: input.excerpt,
      body: input.body,
      content_format: input.content_format,
      status: Status::Draft,
      author_id,
      edition_id: input.edition_id,
      featured: input.featured,
      published_at: None,
      created_at: now,
      updated_at: now,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::EditorialStore::create_article`]. Status, author
/// and timestamps are always assigned by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArticle {
  pub title:          String,
  pub slug:           String,
  #[serde(default)]
  pub excerpt:        String,
  #[serde(default)]
  pub body:           String,
  #[serde(default)]
  pub content_format: ContentFormat,
  #[serde(default)]
  pub edition_id:     Option<Uuid>,
  #[serde(default)]
  pub featured:       bool,
}

impl NewArticle {
  pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
    Self { title: title.into(), slug: slug.into(), ..Default::default() }
  }

  pub fn validate(&self) -> Result<()> {
    validate_title(&self.title)?;
    validate_slug(&self.slug)
  }
}

/// A partial update. Absent fields are left unchanged; `edition_id: null`
/// detaches the article from its edition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleChanges {
  pub title:          Option<String>,
  pub slug:           Option<String>,
  pub excerpt:        Option<String>,
  pub body:           Option<String>,
  pub content_format: Option<ContentFormat>,
  #[serde(default, deserialize_with = "present_or_null")]
  pub edition_id:     Option<Option<Uuid>>,
  pub featured:       Option<bool>,
}

impl ArticleChanges {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    if let Some(title) = &self.title {
      validate_title(title)?;
    }
    if let Some(slug) = &self.slug {
      validate_slug(slug)?;
    }
    Ok(())
  }

  /// Overwrite the fields present in `self`. Status and identity fields are
  /// not reachable from here.
  pub fn apply_to(self, article: &mut Article) {
    if let Some(title) = self.title {
      article.title = title.trim().to_owned();
    }
    if let Some(slug) = self.slug {
      article.slug = slug;
    }
    if let Some(excerpt) = self.excerpt {
      article.excerpt = excerpt;
    }
    if let Some(body) = self.body {
      article.body = body;
    }
    if let Some(format) = self.content_format {
      article.content_format = format;
    }
    if let Some(edition_id) = self.edition_id {
      article.edition_id = edition_id;
    }
    if let Some(featured) = self.featured {
      article.featured = featured;
    }
  }
}

/// Deserialize a field where absence and an explicit `null` differ: absent
/// is `None`, `null` is `Some(None)`.
pub(crate) fn present_or_null<'de, D, T>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::EditorialStore::list_articles`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
  pub status:     Option<Status>,
  pub author_id:  Option<Uuid>,
  pub edition_id: Option<Uuid>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn validate_title(title: &str) -> Result<()> {
  let trimmed = title.trim();
  if trimmed.is_empty() {
    return Err(Error::validation("title", "must not be empty"));
  }
  if trimmed.chars().count() > MAX_TITLE_LEN {
    return Err(Error::validation(
      "title",
      format!("must be at most {MAX_TITLE_LEN} characters"),
    ));
  }
  Ok(())
}

/// Slugs are lowercase ASCII words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<()> {
  if slug.is_empty() {
    return Err(Error::validation("slug", "must not be empty"));
  }
  if slug.len() > MAX_SLUG_LEN {
    return Err(Error::validation(
      "slug",
      format!("must be at most {MAX_SLUG_LEN} characters"),
    ));
  }
  let well_formed = slug
    .split('-')
    .all(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
  if !well_formed {
    return Err(Error::validation(
      "slug",
      format!("{slug:?} is not URL-safe (use lowercase letters, digits and single hyphens)"),
    ));
  }
  Ok(())
}
