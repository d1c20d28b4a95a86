//! Create `app_user` table.
//!
//! Holds the public account fields only; secrets live in `user_credentials`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppUser::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(AppUser::Email, 255).unique_key().not_null())
                    .col(boolean(AppUser::IsVerified).default(false))
                    .col(boolean(AppUser::IsAdmin).default(false))
                    .col(timestamp_with_time_zone(AppUser::CreatedAt).not_null())
                    .col(
                        ColumnDef::new(AppUser::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppUser { Table, Id, Email, IsVerified, IsAdmin, CreatedAt, LastLogin }
