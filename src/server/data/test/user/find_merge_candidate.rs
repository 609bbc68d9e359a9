use super::*;
use chrono::{Duration, Utc};
use test_utils::factory::user::UserFactory;

/// Tests that the newest Steam-only identity is selected.
///
/// Verifies that with an older and a newer Steam-only identity the newer one is
/// returned, regardless of insertion order.
///
/// Expected: Ok(Some(newer))
#[tokio::test]
async fn selects_most_recently_created_steam_only_identity() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let newer = UserFactory::new(db)
        .steam_id("76561197960287931")
        .created_at(now - Duration::minutes(1))
        .build()
        .await?;
    let _older = UserFactory::new(db)
        .steam_id("76561197960287930")
        .created_at(now - Duration::hours(2))
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let candidate = repo.find_merge_candidate().await?.unwrap();

    assert_eq!(candidate.id, newer.id);
    assert!(candidate.discord_id.is_none());

    Ok(())
}

/// Tests that linked and Discord-only identities are never candidates.
///
/// Expected: Ok(None) when no Steam-only identity exists
#[tokio::test]
async fn ignores_linked_and_discord_only_identities() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_linked_user(db, "76561197960287930", "80351110224678912").await?;
    factory::create_discord_user(db, "80351110224678913").await?;
    factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let result = repo.find_merge_candidate().await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that identical creation timestamps fall back to the higher id.
///
/// Expected: Ok(Some(last inserted))
#[tokio::test]
async fn breaks_creation_time_ties_by_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let created_at = Utc::now();
    UserFactory::new(db)
        .steam_id("76561197960287930")
        .created_at(created_at)
        .build()
        .await?;
    let second = UserFactory::new(db)
        .steam_id("76561197960287931")
        .created_at(created_at)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let candidate = repo.find_merge_candidate().await?.unwrap();

    assert_eq!(candidate.id, second.id);

    Ok(())
}
