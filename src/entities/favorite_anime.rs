use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "favorite_anime")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub title: String,
    pub title_english: String,
    pub image_url: String,
    pub kind: String,
    pub episodes: i32,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub synopsis: String,
    pub status: String,
    pub aired_from: String,
    pub aired_to: String,
    /// Comma-joined genre names
    pub genres: String,
    /// Comma-joined studio names
    pub studios: String,
    /// First time the item was saved; kept across re-saves so listing order is stable.
    pub saved_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
