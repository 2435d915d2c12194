use crate::domain::AnimeId;
use crate::entities::{favorite_anime, prelude::*};
use crate::models::favorite::FavoriteRecord;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::debug;

pub struct FavoritesRepository {
    conn: DatabaseConnection,
}

impl FavoritesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_record(model: favorite_anime::Model) -> FavoriteRecord {
        FavoriteRecord {
            id: AnimeId::new(model.id),
            title: model.title,
            title_english: model.title_english,
            image_url: model.image_url,
            kind: model.kind,
            episodes: model.episodes,
            score: model.score,
            synopsis: model.synopsis,
            status: model.status,
            aired_from: model.aired_from,
            aired_to: model.aired_to,
            genres: model.genres,
            studios: model.studios,
        }
    }

    /// Full replace keyed by id. `saved_at` is only written on first insert.
    pub async fn upsert(&self, record: &FavoriteRecord) -> Result<(), DbErr> {
        let saved_at =
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);

        let active_model = favorite_anime::ActiveModel {
            id: Set(record.id.value()),
            title: Set(record.title.clone()),
            title_english: Set(record.title_english.clone()),
            image_url: Set(record.image_url.clone()),
            kind: Set(record.kind.clone()),
            episodes: Set(record.episodes),
            score: Set(record.score),
            synopsis: Set(record.synopsis.clone()),
            status: Set(record.status.clone()),
            aired_from: Set(record.aired_from.clone()),
            aired_to: Set(record.aired_to.clone()),
            genres: Set(record.genres.clone()),
            studios: Set(record.studios.clone()),
            saved_at: Set(saved_at),
        };

        FavoriteAnime::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(favorite_anime::Column::Id)
                    .update_columns([
                        favorite_anime::Column::Title,
                        favorite_anime::Column::TitleEnglish,
                        favorite_anime::Column::ImageUrl,
                        favorite_anime::Column::Kind,
                        favorite_anime::Column::Episodes,
                        favorite_anime::Column::Score,
                        favorite_anime::Column::Synopsis,
                        favorite_anime::Column::Status,
                        favorite_anime::Column::AiredFrom,
                        favorite_anime::Column::AiredTo,
                        favorite_anime::Column::Genres,
                        favorite_anime::Column::Studios,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        debug!("Upserted favorite {} ({})", record.id, record.title);
        Ok(())
    }

    pub async fn delete(&self, id: AnimeId) -> Result<bool, DbErr> {
        let result = FavoriteAnime::delete_many()
            .filter(favorite_anime::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get(&self, id: AnimeId) -> Result<Option<FavoriteRecord>, DbErr> {
        let model = FavoriteAnime::find_by_id(id.value()).one(&self.conn).await?;
        Ok(model.map(Self::map_model_to_record))
    }

    pub async fn list_all(&self) -> Result<Vec<FavoriteRecord>, DbErr> {
        let rows = FavoriteAnime::find()
            .order_by_asc(favorite_anime::Column::SavedAt)
            .order_by_asc(favorite_anime::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_record).collect())
    }

    pub async fn clear(&self) -> Result<u64, DbErr> {
        let result = FavoriteAnime::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
