//! Repository semantics against live PostgreSQL.
//!
//! These run under `#[sqlx::test]` with the embedded migrations and are
//! ignored by default; run with `cargo test -- --ignored` when
//! `DATABASE_URL` points at a dev cluster.

use sqlx::PgPool;

use backlot_db::models::film::{CreateFilm, FilmFilter, UpdateFilm};
use backlot_db::models::notification::NewNotification;
use backlot_db::models::story::{CreateStory, StoryFilter};
use backlot_db::models::user::NewUser;
use backlot_db::repositories::{
    FilmRepo, NotificationRepo, SessionRepo, SettingsRepo, StoryRepo, SubscriberRepo, UserRepo,
};

fn film(slug: &str) -> CreateFilm {
    serde_json::from_value(serde_json::json!({
        "title": "X",
        "slug": slug,
        "category": "Doc",
        "year": "2024",
        "description": "a".repeat(10),
        "image": "https://x/y.jpg",
        "director": "D",
        "producer": "P",
        "duration": "90m",
        "releaseDate": "2024-01-01",
        "synopsis": "b".repeat(10)
    }))
    .expect("valid create payload")
}

fn story(slug: &str, date: &str) -> CreateStory {
    serde_json::from_value(serde_json::json!({
        "title": "T",
        "slug": slug,
        "author": "A",
        "date": date,
        "category": "News"
    }))
    .expect("valid story payload")
}

async fn seed_user(pool: &PgPool, email: &str) -> String {
    let user = UserRepo::create(
        pool,
        &NewUser {
            name: "Staff".into(),
            email: email.into(),
            password_hash: None,
            image: None,
            google_id: None,
            role: "editor".into(),
        },
    )
    .await
    .expect("user insert");
    user.id
}

#[ignore]
#[sqlx::test]
async fn film_create_applies_defaults_and_roundtrips(pool: PgPool) {
    let created = FilmRepo::create(&pool, &film("x-film")).await.expect("create");
    assert_eq!(created.rating, 0.0);
    assert!(!created.featured);
    assert!(created.languages.is_empty());
    assert!(created.awards.is_empty());

    let fetched = FilmRepo::find_by_id(&pool, &created.id)
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(fetched.slug, "x-film");
    assert_eq!(fetched.title, created.title);

    let by_slug = FilmRepo::find_by_slug(&pool, "x-film").await.expect("query");
    assert_eq!(by_slug.map(|f| f.id), Some(created.id));
}

#[ignore]
#[sqlx::test]
async fn duplicate_slug_hits_named_constraint(pool: PgPool) {
    FilmRepo::create(&pool, &film("dup")).await.expect("first create");
    let err = FilmRepo::create(&pool, &film("dup")).await.expect_err("second must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_films_slug"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
    assert_eq!(FilmRepo::count(&pool).await.expect("count"), 1);
}

#[ignore]
#[sqlx::test]
async fn partial_update_leaves_other_fields_alone(pool: PgPool) {
    let created = FilmRepo::create(&pool, &film("patch-me")).await.expect("create");

    let patch: UpdateFilm =
        serde_json::from_value(serde_json::json!({"title": "Renamed"})).expect("patch parses");
    let updated = FilmRepo::update(&pool, &created.id, &patch)
        .await
        .expect("update")
        .expect("row exists");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.slug, "patch-me");
    assert_eq!(updated.director, created.director);
    assert!(updated.updated_at >= created.updated_at);
}

#[ignore]
#[sqlx::test]
async fn update_of_missing_id_returns_none(pool: PgPool) {
    let patch: UpdateFilm =
        serde_json::from_value(serde_json::json!({"title": "Ghost"})).expect("patch parses");
    let result = FilmRepo::update(&pool, "5f2b8c9d1e3a4f5b6c7d8e9f", &patch)
        .await
        .expect("update runs");
    assert!(result.is_none());
}

#[ignore]
#[sqlx::test]
async fn filters_combine_with_and_semantics(pool: PgPool) {
    let mut featured = film("featured-doc");
    featured.featured = true;
    FilmRepo::create(&pool, &featured).await.expect("create");
    FilmRepo::create(&pool, &film("plain-doc")).await.expect("create");

    let filter = FilmFilter {
        category: Some("Doc".into()),
        featured: Some(true),
        limit: 50,
        ..Default::default()
    };
    let rows = FilmRepo::list(&pool, &filter).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "featured-doc");

    // No featured filter: both match the category.
    let filter = FilmFilter {
        category: Some("Doc".into()),
        limit: 50,
        ..Default::default()
    };
    assert_eq!(FilmRepo::list(&pool, &filter).await.expect("list").len(), 2);
}

#[ignore]
#[sqlx::test]
async fn stories_order_by_publish_date_not_insertion(pool: PgPool) {
    StoryRepo::create(&pool, &story("older", "2024-01-01")).await.expect("create");
    StoryRepo::create(&pool, &story("newer", "2024-06-01")).await.expect("create");

    let rows = StoryRepo::list(&pool, &StoryFilter { limit: 10, ..Default::default() })
        .await
        .expect("list");
    assert_eq!(rows[0].slug, "newer");
    assert_eq!(rows[1].slug, "older");
}

#[ignore]
#[sqlx::test]
async fn subscriber_lifecycle_keeps_one_row(pool: PgPool) {
    let created = SubscriberRepo::create(&pool, "fan@example.com", "Fan", &[], "website")
        .await
        .expect("create");
    assert!(created.subscribed);

    let unsubscribed = SubscriberRepo::unsubscribe(&pool, &created.id)
        .await
        .expect("unsubscribe")
        .expect("row exists");
    assert!(!unsubscribed.subscribed);
    assert!(unsubscribed.unsubscribed_at.is_some());

    let resubscribed = SubscriberRepo::resubscribe(&pool, &created.id, "", &[])
        .await
        .expect("resubscribe")
        .expect("row exists");
    assert_eq!(resubscribed.id, created.id);
    assert!(resubscribed.subscribed);
    assert!(resubscribed.unsubscribed_at.is_none());
    assert!(resubscribed.subscribed_at >= created.subscribed_at);
    // Empty name on resubscribe keeps the original.
    assert_eq!(resubscribed.name, "Fan");
}

#[ignore]
#[sqlx::test]
async fn mark_all_read_is_scoped_to_one_user(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;

    let note = NewNotification {
        message: "hello".into(),
        kind: "content".into(),
        related_kind: None,
        related_id: None,
        link: None,
    };
    NotificationRepo::create(&pool, &alice, &note).await.expect("insert");
    NotificationRepo::create(&pool, &alice, &note).await.expect("insert");
    NotificationRepo::create(&pool, &bob, &note).await.expect("insert");

    let marked = NotificationRepo::mark_all_read(&pool, &alice).await.expect("mark");
    assert_eq!(marked, 2);

    assert_eq!(NotificationRepo::unread_count(&pool, &alice).await.expect("count"), 0);
    assert_eq!(NotificationRepo::unread_count(&pool, &bob).await.expect("count"), 1);

    // Re-running touches nothing: already-read rows are excluded.
    assert_eq!(NotificationRepo::mark_all_read(&pool, &alice).await.expect("mark"), 0);
}

#[ignore]
#[sqlx::test]
async fn revoke_all_only_touches_the_given_user(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;
    let ahead = chrono::Utc::now() + chrono::Duration::days(7);

    SessionRepo::create(&pool, &alice, "hash-a1", ahead).await.expect("insert");
    SessionRepo::create(&pool, &alice, "hash-a2", ahead).await.expect("insert");
    SessionRepo::create(&pool, &bob, "hash-b", ahead).await.expect("insert");

    let revoked = SessionRepo::revoke_all_for_user(&pool, &alice).await.expect("revoke");
    assert_eq!(revoked, 2);
    assert!(SessionRepo::find_active_by_hash(&pool, "hash-a1")
        .await
        .expect("query")
        .is_none());
    assert!(SessionRepo::find_active_by_hash(&pool, "hash-b")
        .await
        .expect("query")
        .is_some());

    // Nothing left to revoke on a second pass.
    assert_eq!(
        SessionRepo::revoke_all_for_user(&pool, &alice).await.expect("revoke"),
        0
    );
}

#[ignore]
#[sqlx::test]
async fn cleanup_drops_expired_and_revoked_sessions_only(pool: PgPool) {
    let user = seed_user(&pool, "solo-sessions@example.com").await;
    let ahead = chrono::Utc::now() + chrono::Duration::days(7);
    let behind = chrono::Utc::now() - chrono::Duration::hours(1);

    SessionRepo::create(&pool, &user, "hash-live", ahead).await.expect("insert");
    SessionRepo::create(&pool, &user, "hash-expired", behind).await.expect("insert");
    let stale = SessionRepo::create(&pool, &user, "hash-revoked", ahead).await.expect("insert");
    assert!(SessionRepo::revoke(&pool, &stale.id).await.expect("revoke"));

    let deleted = SessionRepo::cleanup_expired(&pool).await.expect("cleanup");
    assert_eq!(deleted, 2);
    assert!(SessionRepo::find_active_by_hash(&pool, "hash-live")
        .await
        .expect("query")
        .is_some());
}

#[ignore]
#[sqlx::test]
async fn settings_first_read_creates_defaults_once(pool: PgPool) {
    let first = SettingsRepo::get_or_create(&pool).await.expect("first read");
    assert_eq!(first.site_name, "Backlot Films");

    let second = SettingsRepo::get_or_create(&pool).await.expect("second read");
    assert_eq!(second.updated_at, first.updated_at);
}

#[ignore]
#[sqlx::test]
async fn email_in_use_excludes_own_row(pool: PgPool) {
    let id = seed_user(&pool, "solo@example.com").await;
    assert!(UserRepo::email_in_use(&pool, "solo@example.com", None).await.expect("check"));
    assert!(!UserRepo::email_in_use(&pool, "solo@example.com", Some(&id)).await.expect("check"));
}
