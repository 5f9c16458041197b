//! Review notes, the append-only audit trail of publisher decisions.
//!
//! A note is written only as a side effect of an approve or reject
//! transition, inside the same transaction as the status change. Notes are
//! never edited; a correction is a new note.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
  Approved,
  Rejected,
}

/// A reviewer comment anchored to a passage of the article body.
///
/// Stored verbatim: the body may have been edited since, so `selected_text`
/// is not required to still occur in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
  pub selected_text: String,
  #[serde(default)]
  pub comment:       Option<String>,
}

impl Highlight {
  pub fn new(selected_text: impl Into<String>, comment: Option<&str>) -> Self {
    Self { selected_text: selected_text.into(), comment: comment.map(str::to_owned) }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewNote {
  pub id:          Uuid,
  pub article_id:  Uuid,
  pub reviewer_id: Uuid,
  pub decision:    Decision,
  /// Never null; an empty string when the reviewer left no commentary.
  pub note:        String,
  pub highlights:  Vec<Highlight>,
  pub created_at:  DateTime<Utc>,
}

/// A decision waiting to be recorded in the same unit of work as the status
/// change that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReviewNote {
  pub article_id:  Uuid,
  pub reviewer_id: Uuid,
  pub decision:    Decision,
  pub note:        String,
  pub highlights:  Vec<Highlight>,
}

impl NewReviewNote {
  pub fn into_note(self, created_at: DateTime<Utc>) -> ReviewNote {
    ReviewNote {
      id: Uuid::new_v4(),
      article_id: self.article_id,
      reviewer_id: self.reviewer_id,
      decision: self.decision,
      note: self.note,
      highlights: self.highlights,
      created_at,
    }
  }
}
