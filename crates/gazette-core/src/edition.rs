//! Editions: dated bundles of articles, the reader-facing unit.
//!
//! Reader visibility is two independent gates AND-combined: the edition's
//! `is_published` flag and each article's own [`Status::Published`].
//!
//! [`Status::Published`]: crate::article::Status::Published

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  article::{Article, present_or_null},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
  pub id:             Uuid,
  pub title:          String,
  pub description:    String,
  pub publish_date:   NaiveDate,
  /// Optional display ordering.
  pub edition_number: Option<i32>,
  pub is_published:   bool,
  pub cover_images:   Vec<String>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Edition {
  pub fn from_input(input: NewEdition, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      title: input.title.trim().to_owned(),
      description: input.description,
      publish_date: input.publish_date,
      edition_number: input.edition_number,
      is_published: input.is_published,
      cover_images: input.cover_images,
      created_at: now,
      updated_at: now,
    }
  }
}

/// An edition as readers see it: only its PUBLISHED articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEdition {
  #[serde(flatten)]
  pub edition:  Edition,
  pub articles: Vec<Article>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewEdition {
  pub title:          String,
  #[serde(default)]
  pub description:    String,
  pub publish_date:   NaiveDate,
  #[serde(default)]
  pub edition_number: Option<i32>,
  #[serde(default)]
  pub is_published:   bool,
  #[serde(default)]
  pub cover_images:   Vec<String>,
}

impl NewEdition {
  pub fn new(title: impl Into<String>, publish_date: NaiveDate) -> Self {
    Self {
      title: title.into(),
      description: String::new(),
      publish_date,
      edition_number: None,
      is_published: false,
      cover_images: Vec::new(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_title(&self.title)?;
    validate_number(self.edition_number)?;
    validate_covers(&self.cover_images)
  }
}

/// A partial update. `edition_number: null` clears the number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EditionChanges {
  pub title:          Option<String>,
  pub description:    Option<String>,
  pub publish_date:   Option<NaiveDate>,
  #[serde(default, deserialize_with = "present_or_null")]
  pub edition_number: Option<Option<i32>>,
  pub is_published:   Option<bool>,
  pub cover_images:   Option<Vec<String>>,
}

impl EditionChanges {
  pub fn validate(&self) -> Result<()> {
    if let Some(title) = &self.title {
      validate_title(title)?;
    }
    validate_number(self.edition_number.flatten())?;
    if let Some(covers) = &self.cover_images {
      validate_covers(covers)?;
    }
    Ok(())
  }

  pub fn apply_to(self, edition: &mut Edition) {
    if let Some(title) = self.title {
      edition.title = title.trim().to_owned();
    }
    if let Some(description) = self.description {
      edition.description = description;
    }
    if let Some(date) = self.publish_date {
      edition.publish_date = date;
    }
    if let Some(number) = self.edition_number {
      edition.edition_number = number;
    }
    if let Some(published) = self.is_published {
      edition.is_published = published;
    }
    if let Some(covers) = self.cover_images {
      edition.cover_images = covers;
    }
  }
}

fn validate_title(title: &str) -> Result<()> {
  if title.trim().is_empty() {
    return Err(Error::validation("title", "must not be empty"));
  }
  Ok(())
}

fn validate_number(number: Option<i32>) -> Result<()> {
  match number {
    Some(n) if n < 1 => Err(Error::validation("edition_number", "must be positive")),
    _ => Ok(()),
  }
}

fn validate_covers(covers: &[String]) -> Result<()> {
  if covers.iter().any(|url| url.trim().is_empty()) {
    return Err(Error::validation("cover_images", "must not contain empty URLs"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

  #[test]
  fn new_edition_requires_title() {
    let err = NewEdition::new(" ", date()).validate().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "title", .. }));
  }

  #[test]
  fn edition_number_must_be_positive() {
    let mut input = NewEdition::new("Spring", date());
    input.edition_number = Some(0);
    assert!(input.validate().is_err());
    input.edition_number = Some(3);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn changes_can_clear_the_edition_number() {
    let mut input = NewEdition::new("Spring", date());
    input.edition_number = Some(4);
    let mut edition = Edition::from_input(input, Utc::now());

    let keep: EditionChanges = serde_json::from_str(r#"{"title":"Spring special"}"#).unwrap();
    keep.apply_to(&mut edition);
    assert_eq!(edition.edition_number, Some(4));

    let clear: EditionChanges = serde_json::from_str(r#"{"edition_number":null}"#).unwrap();
    assert!(clear.validate().is_ok());
    clear.apply_to(&mut edition);
    assert_eq!(edition.edition_number, None);

    let zero: EditionChanges = serde_json::from_str(r#"{"edition_number":0}"#).unwrap();
    assert!(zero.validate().is_err());
  }

  #[test]
  fn changes_toggle_publication() {
    let mut edition = Edition::from_input(NewEdition::new("Spring", date()), Utc::now());
    assert!(!edition.is_published);

    EditionChanges { is_published: Some(true), ..Default::default() }.apply_to(&mut edition);
    assert!(edition.is_published);
    assert_eq!(edition.title, "Spring");
  }
}
