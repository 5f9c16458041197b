//! [`SqliteStore`], the SQLite implementation of [`EditorialStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{Connection, TransactionBehavior};
use tokio_retry::{
  RetryIf,
  strategy::{ExponentialBackoff, jitter},
};
use uuid::Uuid;

use gazette_core::{
  actor::Actor,
  article::{Article, ArticleChanges, ArticleQuery, NewArticle},
  edition::{Edition, EditionChanges, NewEdition, PublishedEdition},
  permission,
  review::ReviewNote,
  store::EditorialStore,
  workflow::{self, Effect, Payload, Transition, TransitionOutcome},
};

use crate::{Error, Result, articles, editions, reviews, schema::SCHEMA};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Tuning for the connection and for retries of transient failures.
#[derive(Debug, Clone)]
pub struct StoreOptions {
  /// How many times a unit of work is retried after `SQLITE_BUSY`.
  pub busy_retries:    usize,
  /// Backoff multiplier in milliseconds; delays grow 2x, 4x, 8x... of it.
  pub busy_backoff_ms: u64,
  /// How long SQLite itself waits on a lock before reporting busy.
  pub busy_timeout:    Duration,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self {
      busy_retries:    3,
      busy_backoff_ms: 10,
      busy_timeout:    Duration::from_secs(5),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Gazette editorial store backed by a single SQLite file.
///
/// Cloning is cheap; clones share the connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  options: StoreOptions,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with default options.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, StoreOptions::default()).await
  }

  pub async fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, options };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, options: StoreOptions::default() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let busy_timeout = self.options.busy_timeout;
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` on the connection thread, retrying it from scratch while the
  /// database reports busy or locked. Workflow failures pass straight through.
  async fn run<R, F>(&self, label: &'static str, op: F) -> Result<R>
  where
    R: Send + 'static,
    F: Fn(&mut Connection) -> Result<R> + Clone + Send + Sync + 'static,
  {
    let strategy = ExponentialBackoff::from_millis(2)
      .factor(self.options.busy_backoff_ms)
      .max_delay(Duration::from_secs(1))
      .map(jitter)
      .take(self.options.busy_retries);

    RetryIf::start(
      strategy,
      || {
        let op = op.clone();
        async move {
          self
            .conn
            .call(move |conn| Ok(op(conn)))
            .await
            .map_err(Error::from)
            .and_then(|inner| inner)
        }
      },
      |e: &Error| {
        let transient = e.is_transient();
        if transient {
          tracing::warn!(op = label, error = %e, "database busy, retrying");
        }
        transient
      },
    )
    .await
  }
}

/// The current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

fn write_tx(conn: &mut Connection) -> rusqlite::Result<rusqlite::Transaction<'_>> {
  conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

/// The compare-and-swap found a different status than the one decided on.
fn lost_race(article_id: Uuid, transition: Transition) -> Error {
  gazette_core::Error::conflict(format!(
    "article {article_id} changed while applying {transition}"
  ))
  .into()
}

fn require_edition_manager(actor: &Actor) -> Result<()> {
  if permission::can_manage_editions(actor.role) {
    Ok(())
  } else {
    Err(gazette_core::Error::forbidden(format!("{} may not manage editions", actor.role)).into())
  }
}

/// Existence and uniqueness checks for the fields an article write changed.
fn check_references(conn: &Connection, before: Option<&Article>, after: &Article) -> Result<()> {
  if let Some(edition_id) = after.edition_id {
    if before.is_none_or(|b| b.edition_id != after.edition_id) {
      editions::ensure_exists(conn, edition_id)?;
    }
  }
  if before.is_none_or(|b| b.slug != after.slug) {
    articles::ensure_slug_free(conn, &after.slug, after.id)?;
  }
  Ok(())
}

// ─── EditorialStore impl ─────────────────────────────────────────────────────

impl EditorialStore for SqliteStore {
  type Error = Error;

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn create_article(&self, actor: Actor, input: NewArticle) -> Result<Article> {
    if !permission::can_author(actor.role) {
      return Err(gazette_core::Error::forbidden(format!("{} may not author articles", actor.role)).into());
    }
    input.validate()?;
    let article = Article::draft(actor.id, input, now());

    let created = self
      .run("create_article", move |conn| {
        let tx = write_tx(conn)?;
        check_references(&tx, None, &article)?;
        articles::insert(&tx, &article)?;
        tx.commit()?;
        Ok(article.clone())
      })
      .await?;

    tracing::info!(article = %created.id, author = %actor.id, slug = %created.slug, "article created");
    Ok(created)
  }

  async fn update_article(
    &self,
    article_id: Uuid,
    actor: Actor,
    changes: ArticleChanges,
  ) -> Result<Article> {
    if changes.is_empty() {
      return Err(gazette_core::Error::validation("changes", "no fields to update").into());
    }
    changes.validate()?;

    let updated = self
      .run("update_article", move |conn| {
        let tx = write_tx(conn)?;
        let current = articles::require(&tx, article_id)?;
        let next = workflow::decide_update(&current, &actor, changes.clone(), now())?;
        check_references(&tx, Some(&current), &next)?;
        if !articles::update_if_status(&tx, &next, current.status)? {
          return Err(lost_race(article_id, Transition::Edit));
        }
        tx.commit()?;
        Ok(next)
      })
      .await?;

    tracing::debug!(article = %article_id, actor = %actor.id, "article updated");
    Ok(updated)
  }

  async fn get_article(&self, article_id: Uuid) -> Result<Option<Article>> {
    self.run("get_article", move |conn| articles::load(conn, article_id)).await
  }

  async fn list_articles<'a>(&'a self, query: &'a ArticleQuery) -> Result<Vec<Article>> {
    let query = query.clone();
    self.run("list_articles", move |conn| articles::list(conn, &query)).await
  }

  async fn delete_article(&self, article_id: Uuid, actor: Actor) -> Result<()> {
    self
      .apply_transition(article_id, Transition::Delete, actor, Payload::default())
      .await
      .map(|_| ())
  }

  // ── Workflow ──────────────────────────────────────────────────────────────

  async fn apply_transition(
    &self,
    article_id: Uuid,
    transition: Transition,
    actor: Actor,
    payload: Payload,
  ) -> Result<TransitionOutcome> {
    payload.validate_for(transition)?;

    let outcome = self
      .run("apply_transition", move |conn| {
        let tx = write_tx(conn)?;
        let current = articles::require(&tx, article_id)?;
        let at = now();

        let outcome = match workflow::decide(&current, transition, &actor, payload.clone(), at)? {
          Effect::Update { article: next, expected, review } => {
            check_references(&tx, Some(&current), &next)?;
            if !articles::update_if_status(&tx, &next, expected)? {
              return Err(lost_race(article_id, transition));
            }
            let review_note = review
              .map(|r| reviews::record_decision(&tx, r, at))
              .transpose()?;
            TransitionOutcome::Applied { article: next, review_note }
          }
          Effect::Remove { article_id, expected } => {
            if reviews::exists_for_article(&tx, article_id)? {
              return Err(
                gazette_core::Error::conflict(format!(
                  "article {article_id} has review history and cannot be deleted"
                ))
                .into(),
              );
            }
            if !articles::delete_if_status(&tx, article_id, expected)? {
              return Err(lost_race(article_id, transition));
            }
            TransitionOutcome::Deleted { article_id }
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    tracing::info!(
      article = %article_id,
      %transition,
      actor = %actor.id,
      role = %actor.role,
      "transition applied"
    );
    Ok(outcome)
  }

  async fn list_review_notes(&self, article_id: Uuid) -> Result<Vec<ReviewNote>> {
    self
      .run("list_review_notes", move |conn| {
        articles::require(conn, article_id)?;
        reviews::list_for_article(conn, article_id)
      })
      .await
  }

  // ── Editions ──────────────────────────────────────────────────────────────

  async fn create_edition(&self, actor: Actor, input: NewEdition) -> Result<Edition> {
    require_edition_manager(&actor)?;
    input.validate()?;
    let edition = Edition::from_input(input, now());

    let created = self
      .run("create_edition", move |conn| {
        editions::insert(conn, &edition)?;
        Ok(edition.clone())
      })
      .await?;

    tracing::info!(edition = %created.id, actor = %actor.id, "edition created");
    Ok(created)
  }

  async fn update_edition(
    &self,
    edition_id: Uuid,
    actor: Actor,
    changes: EditionChanges,
  ) -> Result<Edition> {
    require_edition_manager(&actor)?;
    changes.validate()?;

    let updated = self
      .run("update_edition", move |conn| {
        let tx = write_tx(conn)?;
        let mut edition = editions::require(&tx, edition_id)?;
        changes.clone().apply_to(&mut edition);
        edition.updated_at = now();
        editions::update(&tx, &edition)?;
        tx.commit()?;
        Ok(edition)
      })
      .await?;

    tracing::info!(
      edition = %edition_id,
      actor = %actor.id,
      published = updated.is_published,
      "edition updated"
    );
    Ok(updated)
  }

  async fn get_edition(&self, edition_id: Uuid) -> Result<Option<Edition>> {
    self.run("get_edition", move |conn| editions::load(conn, edition_id)).await
  }

  async fn list_editions(&self) -> Result<Vec<Edition>> {
    self.run("list_editions", |conn| editions::list(conn, false)).await
  }

  async fn delete_edition(&self, edition_id: Uuid, actor: Actor) -> Result<()> {
    require_edition_manager(&actor)?;

    self
      .run("delete_edition", move |conn| {
        let tx = write_tx(conn)?;
        editions::ensure_exists(&tx, edition_id)?;
        let referenced = articles::count_in_edition(&tx, edition_id)?;
        if referenced > 0 {
          return Err(
            gazette_core::Error::conflict(format!(
              "edition {edition_id} still has {referenced} article(s)"
            ))
            .into(),
          );
        }
        editions::delete(&tx, edition_id)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(edition = %edition_id, actor = %actor.id, "edition deleted");
    Ok(())
  }

  // ── Reader view ───────────────────────────────────────────────────────────

  async fn list_published_editions(&self) -> Result<Vec<PublishedEdition>> {
    self
      .run("list_published_editions", |conn| {
        let tx = conn.transaction()?;
        let listed = editions::list(&tx, true)?;
        let ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
        let mut published = articles::published_in_editions(&tx, &ids)?;
        tx.finish()?;

        Ok(
          listed
            .into_iter()
            .map(|edition| {
              let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut published)
                .into_iter()
                .partition(|a| a.edition_id == Some(edition.id));
              published = rest;
              PublishedEdition { edition, articles: mine }
            })
            .collect(),
        )
      })
      .await
  }

  async fn get_published_edition(&self, edition_id: Uuid) -> Result<Option<PublishedEdition>> {
    self
      .run("get_published_edition", move |conn| {
        let tx = conn.transaction()?;
        let Some(edition) = editions::load(&tx, edition_id)?.filter(|e| e.is_published) else {
          return Ok(None);
        };
        let articles = articles::published_in_editions(&tx, &[edition_id])?;
        tx.finish()?;
        Ok(Some(PublishedEdition { edition, articles }))
      })
      .await
  }
}
