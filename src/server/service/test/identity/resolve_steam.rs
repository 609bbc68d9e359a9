use super::*;

/// Tests a Steam login for an account that has never been seen.
///
/// Expected: Ok(Identity) newly created and not fully authenticated
#[tokio::test]
async fn creates_identity_for_unseen_steam_account() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let identity = linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await?;

    assert_eq!(identity.steam_id.as_deref(), Some(STEAM_A));
    assert_eq!(identity.steam_name.as_deref(), Some("Gabe"));
    assert!(identity.discord_id.is_none());
    assert!(!identity.is_fully_authenticated);
    assert_eq!(user_count(db).await?, 1);

    Ok(())
}

/// Tests a Steam login for a known account.
///
/// Verifies that no record is created, last_login advances and the Discord link
/// is left as it was.
///
/// Expected: Ok(Identity) with the same id
#[tokio::test]
async fn refreshes_known_steam_account() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::create_linked_user(db, STEAM_A, DISCORD_A).await?;

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let identity = linker
        .resolve_steam(&steam_profile(STEAM_A, "Gabe Renamed"))
        .await?;

    assert_eq!(identity.id, existing.id);
    assert_eq!(identity.steam_name.as_deref(), Some("Gabe Renamed"));
    assert_eq!(identity.discord_id.as_deref(), Some(DISCORD_A));
    assert!(identity.is_fully_authenticated);
    assert!(identity.last_login >= existing.last_login);
    assert_eq!(user_count(db).await?, 1);

    Ok(())
}

/// Tests that repeating a Steam login keeps a single identity with the latest profile.
///
/// Expected: one identity carrying the second payload
#[tokio::test]
async fn repeated_steam_login_is_idempotent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let first = linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await?;

    let mut latest = steam_profile(STEAM_A, "Gabe");
    latest.avatar_url = Some("https://avatars.steamstatic.com/new_full.jpg".to_string());
    let second = linker.resolve_steam(&latest).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(
        second.steam_avatar.as_deref(),
        Some("https://avatars.steamstatic.com/new_full.jpg")
    );
    assert_eq!(user_count(db).await?, 1);

    Ok(())
}

/// Tests that a Steam login never touches a Discord-only identity.
///
/// Expected: a separate Steam-only identity is created
#[tokio::test]
async fn does_not_merge_into_discord_only_identity() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let discord_only = factory::create_discord_user(db, DISCORD_A).await?;

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let identity = linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await?;

    assert_ne!(identity.id, discord_only.id);
    assert!(identity.discord_id.is_none());
    assert_eq!(user_count(db).await?, 2);

    Ok(())
}

/// Tests that persistence errors abort the Steam flow.
///
/// Expected: Err(AppError::DbErr)
#[tokio::test]
async fn surfaces_persistence_errors() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    db.execute_unprepared(r#"DROP TABLE "user""#).await?;

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let result = linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
