//! PostgreSQL link repository tests. Run with a database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::{Duration, Utc};
use golinks::domain::entities::Link;
use golinks::domain::repositories::LinkRepository;
use golinks::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_and_load(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.save(Link::new("Meet", "https://meet.example.com/", "alice", Utc::now()))
        .await
        .unwrap();

    let link = repo.load("m-e-e-t").await.unwrap();
    assert_eq!(link.id, "meet");
    assert_eq!(link.short, "Meet");
    assert_eq!(link.owner, "alice");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_replaces_by_id(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let created = Utc::now() - Duration::days(1);

    repo.save(Link::new("meet", "https://old.example.com/", "", created))
        .await
        .unwrap();
    repo.save(Link::new("MEET", "https://new.example.com/", "", Utc::now()))
        .await
        .unwrap();

    let all = repo.load_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].short, "MEET");
    assert_eq!(all[0].long, "https://new.example.com/");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_load_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let err = repo.load("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.save(Link::new("meet", "https://meet.example.com/", "", Utc::now()))
        .await
        .unwrap();

    repo.delete("Meet").await.unwrap();

    assert!(repo.load("meet").await.unwrap_err().is_not_found());
    assert!(repo.delete("meet").await.unwrap_err().is_not_found());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
