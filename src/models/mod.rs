pub mod catalog;
pub mod display;
pub mod favorite;

pub use catalog::{CatalogItem, PageResult, QueryContext, ResultSet};
pub use display::DisplayItem;
pub use favorite::FavoriteRecord;
