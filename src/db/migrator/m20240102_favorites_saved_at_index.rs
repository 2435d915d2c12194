use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_anime_saved_at")
                    .table(FavoriteAnime::Table)
                    .col(FavoriteAnime::SavedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_favorite_anime_saved_at")
                    .table(FavoriteAnime::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteAnime {
    Table,
    SavedAt,
}
