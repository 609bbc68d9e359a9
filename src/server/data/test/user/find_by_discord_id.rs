use super::*;

/// Tests finding a linked identity by Discord ID.
///
/// Expected: Ok(Some(Identity)) with both keys
#[tokio::test]
async fn finds_identity_by_discord_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_linked_user(db, "76561197960287930", "80351110224678912").await?;

    let repo = UserRepository::new(db);
    let identity = repo.find_by_discord_id("80351110224678912").await?.unwrap();

    assert_eq!(identity.id, user.id);
    assert_eq!(identity.steam_id.as_deref(), Some("76561197960287930"));
    assert!(identity.is_fully_authenticated);

    Ok(())
}

/// Tests querying for a Discord ID that is not linked to anything.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unseen_discord_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_steam_user(db, "76561197960287930").await?;

    let repo = UserRepository::new(db);
    let result = repo.find_by_discord_id("80351110224678912").await?;

    assert!(result.is_none());

    Ok(())
}
