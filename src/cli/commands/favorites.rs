use super::render::print_favorites;
use crate::domain::AnimeId;
use crate::models::display::DisplayItem;
use crate::state::AppState;

pub fn cmd_favorites_list(state: &AppState) -> anyhow::Result<()> {
    let records = state.favorites.favorites().borrow().clone();
    print_favorites(&records);
    Ok(())
}

pub async fn cmd_favorites_add(state: &AppState, id: AnimeId) -> anyhow::Result<()> {
    match state.resolver.resolve(id).await {
        Some(DisplayItem::Remote(item)) => {
            state.favorites.save(&item).outcome().await?;
            println!("✓ Saved {} ({})", item.display_title(), item.id);
        }
        Some(DisplayItem::Favorite(record)) => {
            println!("{} is already a favorite.", record.display_title());
        }
        None => println!("Anime with ID {id} not found."),
    }
    Ok(())
}

pub async fn cmd_favorites_remove(state: &AppState, id: AnimeId) -> anyhow::Result<()> {
    if state.favorites.remove(id).outcome().await? {
        println!("✓ Removed {id} from favorites");
    } else {
        println!("Anime with ID {id} is not a favorite.");
    }
    Ok(())
}

pub async fn cmd_favorites_clear(state: &AppState) -> anyhow::Result<()> {
    let removed = state.favorites.clear().outcome().await?;
    println!("✓ Removed {removed} favorites");
    Ok(())
}
