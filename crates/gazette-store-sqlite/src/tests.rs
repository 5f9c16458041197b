//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use gazette_core::{
  ErrorKind, WorkflowFailure as _,
  actor::{Actor, Role},
  article::{Article, ArticleChanges, ArticleQuery, NewArticle, Status},
  edition::{EditionChanges, NewEdition},
  review::{Decision, Highlight},
  store::EditorialStore,
  workflow::{Payload, Transition, TransitionOutcome},
};
use uuid::Uuid;

use crate::{Error, SqliteStore, articles, encode::encode_dt, schema::SCHEMA};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn editor() -> Actor { Actor::new(Uuid::new_v4(), Role::Editor) }

fn publisher() -> Actor { Actor::new(Uuid::new_v4(), Role::Publisher) }

fn kind(err: &Error) -> ErrorKind {
  err.workflow_error().expect("workflow failure").kind()
}

fn applied(outcome: TransitionOutcome) -> Article {
  match outcome {
    TransitionOutcome::Applied { article, .. } => article,
    TransitionOutcome::Deleted { .. } => panic!("expected an applied transition"),
  }
}

async fn draft(s: &SqliteStore, author: Actor, slug: &str) -> Article {
  s.create_article(author, NewArticle::new("A headline", slug))
    .await
    .unwrap()
}

async fn transition(s: &SqliteStore, id: Uuid, t: Transition, actor: Actor) -> Result<Article, Error> {
  s.apply_transition(id, t, actor, Payload::default()).await.map(applied)
}

fn may_first() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

/// Create an article in `edition_id` and take it through to PUBLISHED.
async fn publish_in(s: &SqliteStore, edition_id: Uuid, slug: &str, featured: bool) -> Uuid {
  let author = editor();
  let mut input = NewArticle::new("Story", slug);
  input.edition_id = Some(edition_id);
  input.featured = featured;
  let article = s.create_article(author, input).await.unwrap();
  transition(s, article.id, Transition::Submit, author).await.unwrap();
  transition(s, article.id, Transition::Approve, publisher()).await.unwrap();
  article.id
}

// ─── Articles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_article_is_an_owned_draft() {
  let s = store().await;
  let author = editor();

  let article = draft(&s, author, "launch-day").await;
  assert_eq!(article.status, Status::Draft);
  assert_eq!(article.author_id, author.id);
  assert!(article.published_at.is_none());

  let fetched = s.get_article(article.id).await.unwrap().unwrap();
  assert_eq!(fetched, article);
}

#[tokio::test]
async fn publishers_cannot_author() {
  let s = store().await;
  let err = s
    .create_article(publisher(), NewArticle::new("Nope", "nope"))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
  let s = store().await;
  draft(&s, editor(), "same-slug").await;

  let err = s
    .create_article(editor(), NewArticle::new("Another", "same-slug"))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);
}

#[tokio::test]
async fn renaming_to_a_taken_slug_conflicts() {
  let s = store().await;
  let author = editor();
  draft(&s, author, "first").await;
  let second = draft(&s, author, "second").await;

  let changes = ArticleChanges { slug: Some("first".into()), ..Default::default() };
  let err = s.update_article(second.id, author, changes).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);
}

#[tokio::test]
async fn invalid_slug_is_rejected_before_storage() {
  let s = store().await;
  let err = s
    .create_article(editor(), NewArticle::new("Title", "Not A Slug"))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Validation);
}

#[tokio::test]
async fn unknown_edition_is_not_found() {
  let s = store().await;
  let mut input = NewArticle::new("Title", "orphan");
  input.edition_id = Some(Uuid::new_v4());

  let err = s.create_article(editor(), input).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn published_article_is_no_longer_editable() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "frozen").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  transition(&s, article.id, Transition::Approve, publisher()).await.unwrap();

  let changes = ArticleChanges { body: Some("late fix".into()), ..Default::default() };
  let err = s.update_article(article.id, author, changes).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);
}

#[tokio::test]
async fn empty_update_is_invalid() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "unchanged").await;

  let err = s
    .update_article(article.id, author, ArticleChanges::default())
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Validation);
}

#[tokio::test]
async fn list_filters_by_status_and_author() {
  let s = store().await;
  let alice = editor();
  let bob = editor();
  let a = draft(&s, alice, "alice-one").await;
  draft(&s, alice, "alice-two").await;
  draft(&s, bob, "bob-one").await;
  transition(&s, a.id, Transition::Submit, alice).await.unwrap();

  let by_alice = s
    .list_articles(&ArticleQuery { author_id: Some(alice.id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_alice.len(), 2);

  let queue = s
    .list_articles(&ArticleQuery { status: Some(Status::UnderReview), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(queue.len(), 1);
  assert_eq!(queue[0].id, a.id);

  let paged = s
    .list_articles(&ArticleQuery { limit: Some(2), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(paged.len(), 2);
}

// ─── Workflow ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reject_resubmit_approve_round_trip() {
  let s = store().await;
  let author = editor();
  let reviewer = publisher();
  let article = draft(&s, author, "round-trip").await;

  let submitted = transition(&s, article.id, Transition::Submit, author).await.unwrap();
  assert_eq!(submitted.status, Status::UnderReview);

  let rejected = s
    .apply_transition(
      article.id,
      Transition::Reject,
      reviewer,
      Payload::review("fix intro", vec![]),
    )
    .await
    .unwrap();
  let TransitionOutcome::Applied { article: after_reject, review_note: Some(note) } = rejected else {
    panic!("reject must record a note");
  };
  assert_eq!(after_reject.status, Status::Rejected);
  assert_eq!(note.decision, Decision::Rejected);
  assert_eq!(note.note, "fix intro");
  assert_eq!(note.reviewer_id, reviewer.id);

  // Submit no longer applies; the way back is resubmit.
  let err = transition(&s, article.id, Transition::Submit, author).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);

  transition(&s, article.id, Transition::Resubmit, author).await.unwrap();
  let published = transition(&s, article.id, Transition::Approve, reviewer).await.unwrap();
  assert_eq!(published.status, Status::Published);
  assert!(published.published_at.is_some());

  let notes = s.list_review_notes(article.id).await.unwrap();
  let decisions: Vec<_> = notes.iter().map(|n| n.decision).collect();
  assert_eq!(decisions, [Decision::Rejected, Decision::Approved]);
  assert_eq!(notes[1].note, "");
}

#[tokio::test]
async fn racing_approvals_have_one_winner() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "contested").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();

  let (a, b) = (s.clone(), s.clone());
  let (first, second) = tokio::join!(
    transition(&a, article.id, Transition::Approve, publisher()),
    transition(&b, article.id, Transition::Approve, publisher()),
  );

  let results = [first, second];
  assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
  let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
  assert_eq!(kind(loser), ErrorKind::Conflict);

  let notes = s.list_review_notes(article.id).await.unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].decision, Decision::Approved);
}

#[tokio::test]
async fn approve_after_reject_conflicts_without_a_note() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "late-approval").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  transition(&s, article.id, Transition::Reject, publisher()).await.unwrap();

  let err = transition(&s, article.id, Transition::Approve, publisher()).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);
  assert_eq!(s.list_review_notes(article.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn published_at_survives_archive_cycle() {
  let s = store().await;
  let author = editor();
  let reviewer = publisher();
  let article = draft(&s, author, "evergreen").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  let first = transition(&s, article.id, Transition::Approve, reviewer)
    .await
    .unwrap()
    .published_at;

  let archived = transition(&s, article.id, Transition::Archive, author).await.unwrap();
  assert_eq!(archived.status, Status::Archived);
  let restored = transition(&s, article.id, Transition::Unarchive, reviewer).await.unwrap();
  assert_eq!(restored.status, Status::Published);
  assert_eq!(restored.published_at, first);

  let stored = s.get_article(article.id).await.unwrap().unwrap();
  assert_eq!(stored.published_at, first);
}

#[tokio::test]
async fn other_editors_cannot_act_as_author() {
  let s = store().await;
  let author = editor();
  let stranger = editor();
  let article = draft(&s, author, "not-yours").await;

  let err = transition(&s, article.id, Transition::Submit, stranger).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);

  let err = s.delete_article(article.id, stranger).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);

  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  transition(&s, article.id, Transition::Reject, publisher()).await.unwrap();
  let err = transition(&s, article.id, Transition::Resubmit, stranger).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);
}

#[tokio::test]
async fn highlights_without_note_store_an_empty_note() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "annotated").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();

  let payload = Payload {
    highlights: vec![Highlight::new("the opening line", Some("cut this"))],
    ..Default::default()
  };
  s.apply_transition(article.id, Transition::Reject, publisher(), payload)
    .await
    .unwrap();

  let notes = s.list_review_notes(article.id).await.unwrap();
  assert_eq!(notes[0].note, "");
  assert_eq!(notes[0].highlights, [Highlight::new("the opening line", Some("cut this"))]);
}

#[tokio::test]
async fn revise_save_returns_to_draft_with_changes() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "second-pass").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  transition(&s, article.id, Transition::Reject, publisher()).await.unwrap();

  let changes = ArticleChanges { body: Some("Rewritten.".into()), ..Default::default() };
  let outcome = s
    .apply_transition(article.id, Transition::ReviseSave, author, Payload::with_changes(changes))
    .await
    .unwrap();
  let revised = applied(outcome);
  assert_eq!(revised.status, Status::Draft);
  assert_eq!(revised.body, "Rewritten.");
}

#[tokio::test]
async fn fresh_draft_can_be_deleted() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "scratch").await;

  s.delete_article(article.id, author).await.unwrap();
  assert!(s.get_article(article.id).await.unwrap().is_none());

  let err = s.delete_article(article.id, author).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn reviewed_draft_cannot_be_deleted() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "with-history").await;
  transition(&s, article.id, Transition::Submit, author).await.unwrap();
  transition(&s, article.id, Transition::Reject, publisher()).await.unwrap();
  transition(&s, article.id, Transition::ReviseSave, author).await.unwrap();

  let err = s.delete_article(article.id, author).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);
  assert_eq!(s.list_review_notes(article.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn review_notes_of_unknown_article_are_not_found() {
  let s = store().await;
  let err = s.list_review_notes(Uuid::new_v4()).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn review_fields_on_author_transition_are_invalid() {
  let s = store().await;
  let author = editor();
  let article = draft(&s, author, "chatty").await;

  let err = s
    .apply_transition(article.id, Transition::Submit, author, Payload::review("ready", vec![]))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Validation);
}

#[test]
fn status_writes_refuse_a_stale_expected_status() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn.execute_batch(SCHEMA).unwrap();
  let read = Article::draft(Uuid::new_v4(), NewArticle::new("Raced", "raced"), Utc::now());
  articles::insert(&conn, &read).unwrap();

  // Another writer moved the draft on after it was read.
  let mut submitted = read.clone();
  submitted.status = Status::UnderReview;
  assert!(articles::update_if_status(&conn, &submitted, Status::Draft).unwrap());

  let mut stale = read.clone();
  stale.title = "Lost edit".into();
  assert!(!articles::update_if_status(&conn, &stale, Status::Draft).unwrap());
  assert!(!articles::delete_if_status(&conn, read.id, Status::Draft).unwrap());

  let stored = articles::require(&conn, read.id).unwrap();
  assert_eq!(stored.status, Status::UnderReview);
  assert_eq!(stored.title, "Raced");
}

#[test]
fn status_write_never_overwrites_published_at() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn.execute_batch(SCHEMA).unwrap();
  let mut article = Article::draft(Uuid::new_v4(), NewArticle::new("Once", "once"), Utc::now());
  let first = Utc::now() - chrono::Duration::days(1);
  article.status = Status::Published;
  article.published_at = Some(first);
  articles::insert(&conn, &article).unwrap();

  article.status = Status::Archived;
  article.published_at = Some(Utc::now());
  assert!(articles::update_if_status(&conn, &article, Status::Published).unwrap());

  let stored = articles::require(&conn, article.id).unwrap();
  assert_eq!(stored.published_at.map(encode_dt), Some(encode_dt(first)));
}

// ─── Editions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn customers_cannot_manage_editions() {
  let s = store().await;
  let customer = Actor::new(Uuid::new_v4(), Role::Customer);
  let err = s
    .create_edition(customer, NewEdition::new("May", may_first()))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Forbidden);
}

#[tokio::test]
async fn readers_see_only_published_articles_of_published_editions() {
  let s = store().await;
  let author = editor();
  let reviewer = publisher();

  let edition = s
    .create_edition(author, NewEdition::new("May", may_first()))
    .await
    .unwrap();

  let mut live = NewArticle::new("Live", "live");
  live.edition_id = Some(edition.id);
  let live = s.create_article(author, live).await.unwrap();
  transition(&s, live.id, Transition::Submit, author).await.unwrap();
  transition(&s, live.id, Transition::Approve, reviewer).await.unwrap();

  let mut pending = NewArticle::new("Pending", "pending");
  pending.edition_id = Some(edition.id);
  s.create_article(author, pending).await.unwrap();

  // The edition flag is still off.
  assert!(s.list_published_editions().await.unwrap().is_empty());
  assert!(s.get_published_edition(edition.id).await.unwrap().is_none());

  s.update_edition(
    edition.id,
    reviewer,
    EditionChanges { is_published: Some(true), ..Default::default() },
  )
  .await
  .unwrap();

  let listed = s.list_published_editions().await.unwrap();
  assert_eq!(listed.len(), 1);
  let ids: Vec<_> = listed[0].articles.iter().map(|a| a.id).collect();
  assert_eq!(ids, [live.id]);

  // Archiving removes it from the reader view again.
  transition(&s, live.id, Transition::Archive, reviewer).await.unwrap();
  let one = s.get_published_edition(edition.id).await.unwrap().unwrap();
  assert!(one.articles.is_empty());
}

#[tokio::test]
async fn published_editions_are_newest_first_featured_first() {
  let s = store().await;
  let author = editor();

  let mut older = NewEdition::new("April", NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
  older.is_published = true;
  let older = s.create_edition(author, older).await.unwrap();
  let mut newer = NewEdition::new("May", may_first());
  newer.is_published = true;
  let newer = s.create_edition(author, newer).await.unwrap();

  let plain = publish_in(&s, newer.id, "plain", false).await;
  let lead = publish_in(&s, newer.id, "lead", true).await;

  let listed = s.list_published_editions().await.unwrap();
  let editions: Vec<_> = listed.iter().map(|p| p.edition.id).collect();
  assert_eq!(editions, [newer.id, older.id]);
  let order: Vec<_> = listed[0].articles.iter().map(|a| a.id).collect();
  assert_eq!(order, [lead, plain]);
  assert!(listed[1].articles.is_empty());
}

#[tokio::test]
async fn referenced_edition_cannot_be_deleted() {
  let s = store().await;
  let author = editor();
  let edition = s
    .create_edition(author, NewEdition::new("June", may_first()))
    .await
    .unwrap();

  let mut input = NewArticle::new("Story", "june-story");
  input.edition_id = Some(edition.id);
  let article = s.create_article(author, input).await.unwrap();

  let err = s.delete_edition(edition.id, author).await.unwrap_err();
  assert_eq!(kind(&err), ErrorKind::Conflict);

  let detach = ArticleChanges { edition_id: Some(None), ..Default::default() };
  s.update_article(article.id, author, detach).await.unwrap();
  s.delete_edition(edition.id, author).await.unwrap();
  assert!(s.get_edition(edition.id).await.unwrap().is_none());
}

#[tokio::test]
async fn staff_list_includes_unpublished_editions() {
  let s = store().await;
  let author = editor();
  s.create_edition(author, NewEdition::new("Draft issue", may_first()))
    .await
    .unwrap();

  assert_eq!(s.list_editions().await.unwrap().len(), 1);
  assert!(s.list_published_editions().await.unwrap().is_empty());
}
