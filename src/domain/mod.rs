//! Domain types for catalog browsing and favorites with strong typing.
//!
//! Identities coming from the remote catalog and identities stored in the
//! favorites table share the same newtype so they can never be mixed with
//! page numbers or row counts.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a catalog item (the MyAnimeList id).
///
/// Stable across requests, so it is the only thing passed between screens.
///
/// # Examples
///
/// ```rust
/// use animeshelf::domain::AnimeId;
///
/// let id = AnimeId::new(5114);
/// assert_eq!(id.value(), 5114);
/// assert_eq!(id.to_string(), "5114");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AnimeId(i32);

impl AnimeId {
    /// Creates a new `AnimeId` from a raw i32 value.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `id` is negative.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "AnimeId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AnimeId> for i32 {
    fn from(id: AnimeId) -> Self {
        id.0
    }
}

impl From<i32> for AnimeId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl std::str::FromStr for AnimeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i32 = s.trim().parse()?;
        Ok(Self(id.max(0)))
    }
}

impl Serialize for AnimeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for AnimeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// How successive pages of the same query are presented.
///
/// `Paginated` replaces the visible set on every load. `InfiniteScroll`
/// appends later pages of the same query to what is already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseMode {
    #[default]
    Paginated,
    InfiniteScroll,
}

impl BrowseMode {
    #[must_use]
    pub const fn accumulates(&self) -> bool {
        matches!(self, Self::InfiniteScroll)
    }
}
