pub use super::favorite_anime::Entity as FavoriteAnime;
