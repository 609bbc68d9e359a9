use super::*;
use chrono::{Duration, Utc};
use test_utils::factory::purchase::PurchaseFactory;

/// Tests listing purchases for one identity.
///
/// Verifies that only the owner's purchases are returned and that they are ordered
/// newest first.
///
/// Expected: Ok with two purchases, newest first
#[tokio::test]
async fn returns_owned_purchases_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_identity_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_steam_user(db, "76561197960287930").await?;
    let other = factory::create_steam_user(db, "76561197960287931").await?;

    let now = Utc::now();
    PurchaseFactory::new(db, owner.id)
        .package_name("VIP (30 days)")
        .purchased_at(now - Duration::days(3))
        .build()
        .await?;
    PurchaseFactory::new(db, owner.id)
        .package_name("Kit: Builder")
        .purchased_at(now)
        .build()
        .await?;
    factory::create_purchase(db, other.id).await?;

    let repo = PurchaseRepository::new(db);
    let purchases = repo.get_by_user(owner.id).await?;

    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0].package_name, "Kit: Builder");
    assert_eq!(purchases[1].package_name, "VIP (30 days)");
    assert!(purchases.iter().all(|p| p.user_id == owner.id));

    Ok(())
}

/// Tests an identity without purchases.
///
/// Expected: Ok(empty)
#[tokio::test]
async fn returns_empty_for_identity_without_purchases() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_identity_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_steam_user(db, "76561197960287930").await?;

    let repo = PurchaseRepository::new(db);
    let purchases = repo.get_by_user(owner.id).await?;

    assert!(purchases.is_empty());

    Ok(())
}
