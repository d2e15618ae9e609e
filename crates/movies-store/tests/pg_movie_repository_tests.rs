//! Integration tests for `PgMovieRepository`.

use movies_core::error::DomainError;
use movies_core::movie::Movie;
use movies_core::repository::MovieRepository;
use movies_store::pg_movie_repository::PgMovieRepository;
use movies_test_support::InMemoryMovieRepository;
use sqlx::PgPool;
use uuid::Uuid;

async fn surrogate_of(pool: &PgPool, title: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM movies WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

// --- create + get ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_without_legacy_id_exposes_surrogate_key(pool: PgPool) {
    let repo = PgMovieRepository::new(pool.clone());

    let created = repo.create(&Movie::new("Heat", 1995)).await.unwrap();

    let surrogate = surrogate_of(&pool, "Heat").await;
    assert_eq!(created.id, surrogate.to_string());
    assert_eq!(created.legacy_id, None);
    assert_eq!(repo.get(&created.id).await.unwrap(), created);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_legacy_round_trip_by_both_keys(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool.clone());

    // Act
    let created = repo
        .create(&Movie::new("Alien", 1979).with_legacy_id("7"))
        .await
        .unwrap();
    let by_legacy = repo.get("7").await.unwrap();
    let surrogate = surrogate_of(&pool, "Alien").await;
    let by_surrogate = repo.get(&surrogate.to_string()).await.unwrap();

    // Assert
    assert_eq!(created.id, "7");
    assert_eq!((by_legacy.title.as_str(), by_legacy.year), ("Alien", 1979));
    assert_eq!(by_surrogate, by_legacy);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_unknown_ids_return_not_found(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);

    let legacy = repo.get("999").await;
    let surrogate = repo.get(&Uuid::new_v4().to_string()).await;

    assert!(matches!(legacy, Err(DomainError::NotFound(id)) if id == "999"));
    assert!(matches!(surrogate, Err(DomainError::NotFound(_))));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_uuid_shaped_token_is_never_looked_up_as_legacy_id(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);
    let lookalike = Uuid::new_v4().to_string();
    repo.create(&Movie::new("Heat", 1995).with_legacy_id(lookalike.clone()))
        .await
        .unwrap();

    let result = repo.get(&lookalike).await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
}

// --- uniqueness ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_title_year_conflicts(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);
    repo.create(&Movie::new("Heat", 1995)).await.unwrap();

    let result = repo.create(&Movie::new("Heat", 1995)).await;

    match result {
        Err(DomainError::DuplicateConflict(what)) => assert!(what.starts_with("title/year")),
        other => panic!("expected DuplicateConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_legacy_id_conflicts(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);
    repo.create(&Movie::new("Heat", 1995).with_legacy_id("1"))
        .await
        .unwrap();

    let result = repo
        .create(&Movie::new("Ran", 1985).with_legacy_id("1"))
        .await;

    match result {
        Err(DomainError::DuplicateConflict(what)) => assert_eq!(what, "legacy_id 1"),
        other => panic!("expected DuplicateConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_many_movies_without_legacy_id_do_not_collide(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);

    repo.create(&Movie::new("Heat", 1995)).await.unwrap();
    repo.create(&Movie::new("Ran", 1985)).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}

// --- delete ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_then_delete_again_is_not_found(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool);
    repo.create(&Movie::new("Alien", 1979).with_legacy_id("7"))
        .await
        .unwrap();

    // Act
    let first = repo.delete("7").await;
    let second = repo.delete("7").await;

    // Assert
    assert!(first.is_ok());
    assert!(matches!(second, Err(DomainError::NotFound(_))));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_by_surrogate_key(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);
    let created = repo.create(&Movie::new("Heat", 1995)).await.unwrap();

    repo.delete(&created.id).await.unwrap();

    assert!(matches!(
        repo.get(&created.id).await,
        Err(DomainError::NotFound(_))
    ));
}

// --- list ordering ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_orders_legacy_ids_numerically_then_legacy_less_by_title(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool);
    for movie in [
        Movie::new("Zodiac", 2007),
        Movie::new("Ten", 2010).with_legacy_id("10"),
        Movie::new("Amadeus", 1984),
        Movie::new("Two", 2002).with_legacy_id("2"),
        Movie::new("Eight", 2008).with_legacy_id("8"),
    ] {
        repo.create(&movie).await.unwrap();
    }

    // Act
    let titles: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();

    // Assert
    assert_eq!(titles, vec!["Two", "Eight", "Ten", "Amadeus", "Zodiac"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_order_matches_in_memory_repository_for_mixed_case_ids(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool);
    let in_memory = InMemoryMovieRepository::new();
    for (n, legacy) in ["b1", "A2", "a-1", "a10"].into_iter().enumerate() {
        let movie = Movie::new(format!("Movie {n}"), 2000).with_legacy_id(legacy);
        repo.create(&movie).await.unwrap();
        in_memory.create(&movie).await.unwrap();
    }

    // Act
    let ids = |movies: Vec<Movie>| movies.into_iter().map(|m| m.id).collect::<Vec<_>>();
    let stored = ids(repo.list().await.unwrap());
    let expected = ids(in_memory.list().await.unwrap());

    // Assert
    assert_eq!(stored, vec!["A2", "a-1", "a10", "b1"]);
    assert_eq!(stored, expected);
}

// --- concurrency ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_creates_of_same_movie_have_exactly_one_winner(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool);
    let attempts = 8;

    // Act
    let handles: Vec<_> = (0..attempts)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create(&Movie::new("Heat", 1995)).await })
        })
        .collect();
    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(DomainError::DuplicateConflict(_)) => conflicts += 1,
            Err(other) => panic!("expected DuplicateConflict, got {other:?}"),
        }
    }

    // Assert
    assert_eq!(created, 1);
    assert_eq!(conflicts, attempts - 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

// --- bulk insert ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_bulk_insert_twice_inserts_nothing_the_second_time(pool: PgPool) {
    // Arrange
    let repo = PgMovieRepository::new(pool);
    let batch = vec![
        Movie::new("Heat", 1995).with_legacy_id("1"),
        Movie::new("Alien", 1979).with_legacy_id("2"),
        Movie::new("Ran", 1985),
    ];

    // Act
    let first = repo.bulk_insert_ignoring_duplicates(&batch).await.unwrap();
    let second = repo.bulk_insert_ignoring_duplicates(&batch).await.unwrap();

    // Assert
    assert_eq!(first, 3);
    assert_eq!(second, 0);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_bulk_insert_skips_duplicates_within_and_across_batches(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);
    repo.create(&Movie::new("Heat", 1995)).await.unwrap();
    let batch = vec![
        Movie::new("Heat", 1995),
        Movie::new("Ran", 1985),
        Movie::new("Ran", 1985),
        Movie::new("Other Ran", 1985).with_legacy_id("5"),
        Movie::new("Another", 1990).with_legacy_id("5"),
    ];

    let inserted = repo.bulk_insert_ignoring_duplicates(&batch).await.unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_bulk_insert_of_empty_batch_is_zero(pool: PgPool) {
    let repo = PgMovieRepository::new(pool);

    let inserted = repo.bulk_insert_ignoring_duplicates(&[]).await.unwrap();

    assert_eq!(inserted, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_bulk_insert_non_duplicate_failure_reports_zero_inserted(pool: PgPool) {
    // Arrange: the table vanishes underneath the repository.
    let repo = PgMovieRepository::new(pool.clone());
    sqlx::query("DROP TABLE movies").execute(&pool).await.unwrap();

    // Act
    let result = repo
        .bulk_insert_ignoring_duplicates(&[Movie::new("Heat", 1995)])
        .await;

    // Assert
    match result {
        Err(DomainError::BulkInsert { inserted, .. }) => assert_eq!(inserted, 0),
        other => panic!("expected BulkInsert, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_storage_failure_maps_to_infrastructure(pool: PgPool) {
    let repo = PgMovieRepository::new(pool.clone());
    sqlx::query("DROP TABLE movies").execute(&pool).await.unwrap();

    let result = repo.list().await;

    assert!(matches!(result, Err(DomainError::Infrastructure(_))));
}
