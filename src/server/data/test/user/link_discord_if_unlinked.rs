use super::*;
use sea_orm::EntityTrait;

/// Tests the conditional link write on an identity that is still a candidate.
///
/// Expected: Ok(Some(Identity)) linked and fully authenticated
#[tokio::test]
async fn links_unclaimed_candidate() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_steam_user(db, "76561197960287930").await?;

    let repo = UserRepository::new(db);
    let identity = repo
        .link_discord_if_unlinked(user.id, &discord_profile("80351110224678912", "nelly"))
        .await?
        .unwrap();

    assert_eq!(identity.discord_id.as_deref(), Some("80351110224678912"));
    assert_eq!(identity.discord_display_name.as_deref(), Some("nelly"));
    assert!(identity.is_fully_authenticated);

    Ok(())
}

/// Tests that a candidate claimed after selection is left untouched.
///
/// Simulates the race: the candidate is linked to another Discord account between
/// selection and write.
///
/// Expected: Ok(None) and the first link preserved
#[tokio::test]
async fn skips_candidate_claimed_concurrently() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_steam_user(db, "76561197960287930").await?;

    let repo = UserRepository::new(db);
    let candidate = repo.find_merge_candidate().await?.unwrap();
    repo.link_discord(user.id, &discord_profile("80351110224678912", "first"))
        .await?;

    let result = repo
        .link_discord_if_unlinked(candidate.id, &discord_profile("80351110224678999", "second"))
        .await?;

    assert!(result.is_none());
    let stored = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.discord_id.as_deref(), Some("80351110224678912"));

    Ok(())
}

/// Tests that identities without a Steam key are never linked by the merge write.
///
/// Expected: Ok(None)
#[tokio::test]
async fn skips_identity_without_steam_key() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let result = repo
        .link_discord_if_unlinked(user.id, &discord_profile("80351110224678912", "nelly"))
        .await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that linking a Discord id owned by another identity hits the unique index.
///
/// Expected: Err(DbErr) classified as a unique violation
#[tokio::test]
async fn rejects_discord_id_owned_elsewhere() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_discord_user(db, "80351110224678912").await?;
    let candidate = factory::create_steam_user(db, "76561197960287930").await?;

    let repo = UserRepository::new(db);
    let result = repo
        .link_discord_if_unlinked(candidate.id, &discord_profile("80351110224678912", "nelly"))
        .await;

    assert!(result.is_err());
    assert!(is_unique_violation(&result.unwrap_err()));

    Ok(())
}

/// Tests the conditional link write on an identity deleted after selection.
///
/// Expected: Ok(None) and no identity created
#[tokio::test]
async fn skips_candidate_deleted_after_selection() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_steam_user(db, "76561197960287930").await?;

    let repo = UserRepository::new(db);
    let candidate = repo.find_merge_candidate().await?.unwrap();
    entity::prelude::User::delete_by_id(user.id).exec(db).await?;

    let result = repo
        .link_discord_if_unlinked(candidate.id, &discord_profile("80351110224678912", "nelly"))
        .await?;

    assert!(result.is_none());
    assert!(repo.find_by_discord_id("80351110224678912").await?.is_none());

    Ok(())
}
