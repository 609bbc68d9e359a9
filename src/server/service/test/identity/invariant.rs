use super::*;

/// Tests the linking flag across a mixed sequence of logins.
///
/// Runs Steam and Discord logins in an order that exercises every resolution path:
/// creation, refresh, merge and Discord-only creation.
///
/// Expected: is_fully_authenticated is true exactly for identities with both keys
#[tokio::test]
async fn linking_flag_tracks_both_keys() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let linker = IdentityLinker::new(db, LinkMode::Guarded);

    linker.resolve_discord(&discord_profile(DISCORD_A, "early")).await?;
    assert_linking_invariant(db).await?;

    linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await?;
    assert_linking_invariant(db).await?;

    linker.resolve_discord(&discord_profile(DISCORD_B, "late")).await?;
    assert_linking_invariant(db).await?;

    linker.resolve_steam(&steam_profile(STEAM_A, "Gabe")).await?;
    linker.resolve_discord(&discord_profile(DISCORD_B, "late")).await?;
    linker.resolve_discord(&discord_profile(DISCORD_A, "early")).await?;
    linker.resolve_steam(&steam_profile(STEAM_B, "Robin")).await?;
    assert_linking_invariant(db).await?;

    let linked = User::find()
        .all(db)
        .await?
        .into_iter()
        .filter(|user| user.is_fully_authenticated)
        .count();
    assert_eq!(linked, 1);
    assert_eq!(user_count(db).await?, 3);

    Ok(())
}
