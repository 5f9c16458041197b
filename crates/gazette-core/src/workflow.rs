//! The editorial state machine.
//!
//! [`decide`] is the pure half of the Workflow Engine: given the article as
//! currently stored, the requested [`Transition`] and the acting [`Actor`], it
//! either returns the [`Effect`] to persist or the typed reason the request
//! fails. Backends call it inside their write transaction, so the decision and
//! its persistence form one unit of work.
//!
//! Edge table:
//!
//! | Transition    | From         | To           |
//! |---------------|--------------|--------------|
//! | `submit`      | draft        | under_review |
//! | `approve`     | under_review | published    |
//! | `reject`      | under_review | rejected     |
//! | `revise_save` | rejected     | draft        |
//! | `resubmit`    | rejected     | under_review |
//! | `edit`        | draft        | draft        |
//! | `archive`     | published    | archived     |
//! | `unarchive`   | archived     | published    |
//! | `delete`      | draft        | (removed)    |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  article::{Article, ArticleChanges, Status},
  permission,
  review::{Decision, Highlight, NewReviewNote, ReviewNote},
};

// ─── Transition ──────────────────────────────────────────────────────────────

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
pub enum Transition {
  Submit,
  Approve,
  Reject,
  ReviseSave,
  Resubmit,
  Edit,
  Archive,
  Unarchive,
  Delete,
}

impl Transition {
  /// The only status this transition may be applied from.
  pub fn source(self) -> Status {
    match self {
      Self::Submit | Self::Edit | Self::Delete => Status::Draft,
      Self::Approve | Self::Reject => Status::UnderReview,
      Self::ReviseSave | Self::Resubmit => Status::Rejected,
      Self::Archive => Status::Published,
      Self::Unarchive => Status::Archived,
    }
  }

  /// The resulting status; `None` when the article is removed.
  pub fn target(self) -> Option<Status> {
    match self {
      Self::Submit | Self::Resubmit => Some(Status::UnderReview),
      Self::Approve | Self::Unarchive => Some(Status::Published),
      Self::Reject => Some(Status::Rejected),
      Self::ReviseSave | Self::Edit => Some(Status::Draft),
      Self::Archive => Some(Status::Archived),
      Self::Delete => None,
    }
  }

  /// Transitions only the article's author (or a super admin) may perform.
  pub fn is_author_scoped(self) -> bool {
    matches!(
      self,
      Self::Submit | Self::ReviseSave | Self::Resubmit | Self::Edit | Self::Delete
    )
  }

  /// Transitions that record a [`ReviewNote`].
  pub fn is_review(self) -> bool { matches!(self, Self::Approve | Self::Reject) }

  /// Author transitions that may carry field changes in their payload.
  pub fn accepts_changes(self) -> bool {
    matches!(self, Self::Submit | Self::Resubmit | Self::ReviseSave | Self::Edit)
  }
}

/// Statuses one edge downstream of `from`.
pub fn successors(from: Status) -> impl Iterator<Item = Status> {
  Transition::iter()
    .filter(move |t| t.source() == from)
    .filter_map(Transition::target)
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// Optional data accompanying a transition request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
  /// Reviewer commentary; approve/reject only.
  #[serde(default)]
  pub note:       Option<String>,
  /// Inline annotations; approve/reject only.
  #[serde(default)]
  pub highlights: Vec<Highlight>,
  /// Field edits applied together with an author transition.
  #[serde(default)]
  pub changes:    Option<ArticleChanges>,
}

impl Payload {
  pub fn review(note: impl Into<String>, highlights: Vec<Highlight>) -> Self {
    Self { note: Some(note.into()), highlights, changes: None }
  }

  pub fn with_changes(changes: ArticleChanges) -> Self {
    Self { changes: Some(changes), ..Default::default() }
  }

  /// Shape checks that need no stored state. Run before any transaction.
  pub fn validate_for(&self, transition: Transition) -> Result<()> {
    if !transition.is_review() && (self.note.is_some() || !self.highlights.is_empty()) {
      return Err(Error::validation(
        "note",
        format!("{transition} does not record a review note"),
      ));
    }
    if self.highlights.iter().any(|h| h.selected_text.is_empty()) {
      return Err(Error::validation("highlights", "selected_text must not be empty"));
    }
    match &self.changes {
      Some(_) if !transition.accepts_changes() => Err(Error::validation(
        "changes",
        format!("{transition} does not accept field changes"),
      )),
      Some(changes) => changes.validate(),
      None => Ok(()),
    }
  }
}

// ─── Effect ──────────────────────────────────────────────────────────────────

/// What a backend must persist, atomically, for an accepted transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
  Update {
    /// The article as it must be stored.
    article:  Article,
    /// The status the write must still find in storage.
    expected: Status,
    review:   Option<NewReviewNote>,
  },
  Remove {
    article_id: Uuid,
    expected:   Status,
  },
}

/// The result returned to the caller once an effect has committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
  Applied {
    article:     Article,
    review_note: Option<ReviewNote>,
  },
  Deleted {
    article_id: Uuid,
  },
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// Decide a transition against the stored `article`.
///
/// The payload must already have passed [`Payload::validate_for`].
pub fn decide(
  article: &Article,
  transition: Transition,
  actor: &Actor,
  payload: Payload,
  now: DateTime<Utc>,
) -> Result<Effect> {
  if !permission::can_transition(actor.role, article.status, transition) {
    return Err(Error::forbidden(format!(
      "{} may not {transition} an article that is {}",
      actor.role, article.status
    )));
  }

  if transition.is_author_scoped() && !is_author_or_super_admin(article, actor) {
    return Err(Error::forbidden(format!(
      "only the author of article {} may {transition} it",
      article.id
    )));
  }

  if article.status != transition.source() {
    return Err(Error::conflict(format!(
      "article {} is {}, {transition} requires {}",
      article.id,
      article.status,
      transition.source()
    )));
  }

  let Some(target) = transition.target() else {
    return Ok(Effect::Remove { article_id: article.id, expected: article.status });
  };

  let mut next = article.clone();
  if let Some(changes) = payload.changes {
    changes.apply_to(&mut next);
  }
  next.status = target;
  next.updated_at = now;
  if target == Status::Published && next.published_at.is_none() {
    next.published_at = Some(now);
  }

  let review = match transition {
    Transition::Approve => Some(Decision::Approved),
    Transition::Reject => Some(Decision::Rejected),
    _ => None,
  }
  .map(|decision| NewReviewNote {
    article_id: article.id,
    reviewer_id: actor.id,
    decision,
    note: payload.note.unwrap_or_default(),
    highlights: payload.highlights,
  });

  Ok(Effect::Update { article: next, expected: article.status, review })
}

/// Decide a plain field update (no status change) against the stored article.
pub fn decide_update(
  article: &Article,
  actor: &Actor,
  changes: ArticleChanges,
  now: DateTime<Utc>,
) -> Result<Article> {
  if !permission::can_author(actor.role) || !is_author_or_super_admin(article, actor) {
    return Err(Error::forbidden(format!(
      "only the author of article {} may edit it",
      article.id
    )));
  }
  if !article.status.is_editable() {
    return Err(Error::conflict(format!(
      "article {} is {} and can no longer be edited",
      article.id, article.status
    )));
  }

  let mut next = article.clone();
  changes.apply_to(&mut next);
  next.updated_at = now;
  Ok(next)
}

fn is_author_or_super_admin(article: &Article, actor: &Actor) -> bool {
  actor.is_super_admin() || actor.id == article.author_id
}
