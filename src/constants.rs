pub const UNKNOWN: &str = "Unknown";

pub const NOT_AVAILABLE: &str = "Not available";

pub const LIST_SEPARATOR: &str = ", ";

pub mod jikan {

    pub const BASE_URL: &str = "https://api.jikan.moe/v4";

    pub const TOP_PAGE_SIZE: u32 = 24;

    pub const SEARCH_PAGE_SIZE: u32 = 25;

    /// Jikan rejects `limit` values above this.
    pub const MAX_PAGE_SIZE: u32 = 25;

    pub const ORDER_BY: &str = "score";

    pub const SORT: &str = "desc";

    pub const USER_AGENT: &str = "AnimeShelf/0.1";
}

pub mod display {

    pub const DATE_FORMAT: &str = "%d/%m/%Y";
}
