pub mod prelude;

pub mod favorite_anime;
