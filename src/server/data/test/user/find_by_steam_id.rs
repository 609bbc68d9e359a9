use super::*;

/// Tests finding an identity by Steam ID.
///
/// Expected: Ok(Some(Identity)) for the matching Steam account only
#[tokio::test]
async fn finds_identity_by_steam_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_steam_user(db, "76561197960287930").await?;
    let expected = factory::create_steam_user(db, "76561197960287931").await?;

    let repo = UserRepository::new(db);
    let identity = repo.find_by_steam_id("76561197960287931").await?.unwrap();

    assert_eq!(identity.id, expected.id);

    Ok(())
}

/// Tests that Discord-only identities are not matched by a Steam lookup.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unseen_steam_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_discord_user(db, "80351110224678912").await?;

    let repo = UserRepository::new(db);
    let result = repo.find_by_steam_id("76561197960287930").await?;

    assert!(result.is_none());

    Ok(())
}
