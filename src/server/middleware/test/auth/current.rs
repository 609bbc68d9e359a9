use super::*;

/// Tests resolving a session without a principal.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_without_principal() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_table(User).build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let identity = AuthGuard::new(db, session).current().await?;

    assert!(identity.is_none());

    Ok(())
}

/// Tests resolving a stored principal back into an identity.
///
/// Expected: Ok(Some(Identity)) for the stored id
#[tokio::test]
async fn resolves_stored_principal() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_table(User).build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_steam_user(db, "76561197960287930").await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let identity = AuthGuard::new(db, session).current().await?.unwrap();

    assert_eq!(identity.id, user.id);
    assert_eq!(identity.steam_id.as_deref(), Some("76561197960287930"));

    Ok(())
}

/// Tests a session whose identity has been deleted.
///
/// Verifies the corrupted session is reported distinctly from "not logged in" and
/// that the stale principal is cleared.
///
/// Expected: Err(AuthError::UserNotInDatabase), then Ok(None) on the next call
#[tokio::test]
async fn reports_and_clears_stale_principal() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_table(User).build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_steam_user(db, "76561197960287930").await?;
    let user_id = user.id;
    AuthSession::new(session).set_user_id(user_id).await?;
    user.delete(db).await?;

    let guard = AuthGuard::new(db, session);
    let result = guard.current().await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(id))) if id == user_id
    ));
    assert_eq!(AuthSession::new(session).get_user_id().await?, None);
    assert!(guard.current().await?.is_none());

    Ok(())
}
