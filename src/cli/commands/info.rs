use super::render::print_detail;
use crate::domain::AnimeId;
use crate::state::AppState;

pub async fn cmd_info(state: &AppState, id: AnimeId) -> anyhow::Result<()> {
    let Some(item) = state.resolver.resolve(id).await else {
        println!("Anime with ID {id} not found.");
        return Ok(());
    };

    let is_favorite = state.favorites.is_favorite(id).await;
    print_detail(&item, is_favorite);

    Ok(())
}
