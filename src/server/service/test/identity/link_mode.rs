use super::*;

/// Simulates a concurrent login that takes the Discord id right before the merge write.
///
/// The row inserted by the trigger is rolled back together with the failing update, so
/// every attempt conflicts again.
const CONCURRENT_DISCORD_LOGIN: &str = r#"
CREATE TRIGGER concurrent_discord_login
BEFORE UPDATE OF discord_id ON "user"
WHEN NEW.discord_id IS NOT NULL AND OLD.discord_id IS NULL
BEGIN
    INSERT INTO "user" (discord_id, discord_username, is_fully_authenticated, last_login, created_at)
    VALUES (
        NEW.discord_id,
        'racer',
        0,
        strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
        strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    );
END
"#;

/// Tests two concurrent Discord logins competing for one merge candidate.
///
/// Verifies that the guarded write lets exactly one login claim the candidate and
/// the other falls through to a new Discord-only identity.
///
/// Expected: one merge, one new identity, invariant holds
#[tokio::test]
async fn guarded_concurrent_logins_merge_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let candidate = factory::create_steam_user(db, STEAM_A).await?;

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let profile_a = discord_profile(DISCORD_A, "first");
    let profile_b = discord_profile(DISCORD_B, "second");
    let (first, second) = tokio::join!(
        linker.resolve_discord(&profile_a),
        linker.resolve_discord(&profile_b)
    );
    let (first, second) = (first?, second?);

    let merged: Vec<_> = [&first, &second]
        .into_iter()
        .filter(|identity| identity.id == candidate.id)
        .collect();
    assert_eq!(merged.len(), 1);
    assert!(merged[0].is_fully_authenticated);

    let created = if first.id == candidate.id { &second } else { &first };
    assert!(created.steam_id.is_none());
    assert!(!created.is_fully_authenticated);

    assert_eq!(user_count(db).await?, 2);
    assert_linking_invariant(db).await?;

    Ok(())
}

/// Tests that the unguarded write reports a unique key conflict as a linking conflict.
///
/// Expected: Err(AuthError::LinkingConflict) and the candidate left unlinked
#[tokio::test]
async fn unguarded_duplicate_key_is_linking_conflict() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let candidate = factory::create_steam_user(db, STEAM_A).await?;
    db.execute_unprepared(CONCURRENT_DISCORD_LOGIN).await?;

    let linker = IdentityLinker::new(db, LinkMode::Unguarded);
    let result = linker
        .resolve_discord(&discord_profile(DISCORD_A, "nelly"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::LinkingConflict(_)))
    ));
    let candidate = User::find_by_id(candidate.id).one(db).await?.unwrap();
    assert!(candidate.discord_id.is_none());

    Ok(())
}

/// Tests that the guarded write gives up after repeated conflicts.
///
/// Expected: Err(AuthError::LinkingConflict) instead of a raw database error
#[tokio::test]
async fn guarded_gives_up_after_repeated_conflicts() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_steam_user(db, STEAM_A).await?;
    db.execute_unprepared(CONCURRENT_DISCORD_LOGIN).await?;

    let linker = IdentityLinker::new(db, LinkMode::Guarded);
    let result = linker
        .resolve_discord(&discord_profile(DISCORD_A, "nelly"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::LinkingConflict(_)))
    ));
    assert_eq!(user_count(db).await?, 1);

    Ok(())
}

/// Tests that both modes behave identically without contention.
///
/// Expected: the candidate is merged in unguarded mode as well
#[tokio::test]
async fn unguarded_merges_without_contention() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let candidate = factory::create_steam_user(db, STEAM_A).await?;

    let linker = IdentityLinker::new(db, LinkMode::Unguarded);
    let linked = linker
        .resolve_discord(&discord_profile(DISCORD_A, "nelly"))
        .await?;

    assert_eq!(linked.id, candidate.id);
    assert!(linked.is_fully_authenticated);
    assert_eq!(user_count(db).await?, 1);

    Ok(())
}
