use super::*;

#[tokio::test]
async fn seeding_twice_inserts_samples_once() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let first = seed_if_empty(&storage).await.expect("seed");
    let inserted = first.expect("empty database is seeded");
    assert!(inserted > 0);

    let second = seed_if_empty(&storage).await.expect("seed again");
    assert_eq!(second, None);
    assert_eq!(
        storage.count_incidents().await.expect("count"),
        inserted as i64
    );
}
