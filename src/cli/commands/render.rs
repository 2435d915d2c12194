use std::collections::HashSet;

use crate::constants::UNKNOWN;
use crate::domain::AnimeId;
use crate::domain::events::RejectReason;
use crate::models::catalog::{QueryContext, ResultSet};
use crate::models::display::DisplayItem;
use crate::models::favorite::FavoriteRecord;
use crate::services::{FavoritesController, LoadOutcome};

const TITLE_WIDTH: usize = 44;

pub fn favorite_ids(favorites: &FavoritesController) -> HashSet<AnimeId> {
    favorites.favorites().borrow().iter().map(|r| r.id).collect()
}

fn clip(title: &str) -> String {
    if title.chars().count() <= TITLE_WIDTH {
        return title.to_string();
    }
    let mut clipped: String = title.chars().take(TITLE_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

pub fn print_page(set: &ResultSet, favorites: &HashSet<AnimeId>) {
    let heading = match &set.context {
        QueryContext::Top => "Top anime".to_string(),
        QueryContext::Search(term) => format!("Results for '{term}'"),
    };

    println!();
    println!("{heading} (page {}/{})", set.page, set.last_page);
    println!("{:-<72}", "");

    if set.is_empty() {
        println!("Nothing here.");
        return;
    }

    for (index, item) in set.items.iter().enumerate() {
        let marker = if favorites.contains(&item.id) { "★" } else { " " };
        let eps = item
            .episodes
            .map_or_else(|| "?".to_string(), |e| e.to_string());
        let score = item
            .score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));

        println!(
            "{:>3}. {marker} {:>6}  {:<width$}  {:<8} {:>4} eps  {:>5}",
            index + 1,
            item.id.value(),
            clip(item.display_title()),
            item.kind.as_deref().unwrap_or(UNKNOWN),
            eps,
            score,
            width = TITLE_WIDTH,
        );
    }

    if set.has_next_page {
        println!("{:-<72}", "");
        println!("More pages available.");
    }
}

pub fn print_favorites(records: &[FavoriteRecord]) {
    println!();
    println!("Favorites ({})", records.len());
    println!("{:-<72}", "");

    if records.is_empty() {
        println!("No favorites saved yet.");
        return;
    }

    for record in records {
        let eps = if record.episodes > 0 {
            record.episodes.to_string()
        } else {
            "?".to_string()
        };
        println!(
            "★ {:>6}  {:<width$}  {:<8} {:>4} eps",
            record.id.value(),
            clip(record.display_title()),
            record.kind,
            eps,
            width = TITLE_WIDTH,
        );
    }
}

pub fn print_detail(item: &DisplayItem, is_favorite: bool) {
    println!();
    println!("Anime Info");
    println!("{:-<72}", "");
    println!("Title:    {}", item.title());
    if item.display_title() != item.title() {
        println!("English:  {}", item.display_title());
    }
    println!("ID:       {}", item.id());
    println!("Type:     {}", item.kind());
    println!(
        "Episodes: {}",
        item.episodes()
            .map_or_else(|| "?".to_string(), |e| e.to_string())
    );
    println!(
        "Score:    {}",
        item.score()
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"))
    );
    println!("Status:   {}", item.status());
    println!("Aired:    {} to {}", item.aired_from(), item.aired_to());
    println!("Genres:   {}", item.genres());
    println!("Studios:  {}", item.studios());
    println!("Image:    {}", item.image_url());
    println!(
        "Favorite: {}{}",
        if is_favorite { "yes" } else { "no" },
        if item.is_favorite_record() {
            " (loaded from favorites)"
        } else {
            ""
        }
    );
    println!();
    println!("{}", item.synopsis());
}

pub const fn describe_reject(reason: &RejectReason) -> &'static str {
    match reason {
        RejectReason::SearchInFlight => "A search is still loading.",
        RejectReason::AtLastPage => "Already on the last page.",
        RejectReason::AtFirstPage => "Already on the first page.",
        RejectReason::NotPaginated => "Pages accumulate in this mode; there is no previous page.",
        RejectReason::PageLoading => "Still loading the previous page.",
    }
}

/// Prints anything other than an applied page, which the caller renders itself.
pub fn report_outcome(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Applied { .. } => {}
        LoadOutcome::Rejected(reason) => println!("{}", describe_reject(reason)),
        LoadOutcome::Stale => println!("A newer request superseded this one."),
        LoadOutcome::Failed(e) => println!("⚠ Failed to load: {e}"),
    }
}
