use sea_orm_migration::{prelude::*, schema::*};

use super::m20251210_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Purchase::Table)
                    .if_not_exists()
                    .col(pk_auto(Purchase::Id))
                    .col(integer(Purchase::UserId))
                    .col(string_uniq(Purchase::TransactionId))
                    .col(string(Purchase::PackageName))
                    .col(big_integer(Purchase::AmountCents))
                    .col(string(Purchase::Currency))
                    .col(timestamp_with_time_zone(Purchase::PurchasedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_user_id")
                            .from(Purchase::Table, Purchase::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_user_id")
                    .table(Purchase::Table)
                    .col(Purchase::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Purchase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Purchase {
    Table,
    Id,
    UserId,
    TransactionId,
    PackageName,
    AmountCents,
    Currency,
    PurchasedAt,
}
