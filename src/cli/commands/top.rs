use super::render::{favorite_ids, print_page, report_outcome};
use crate::state::AppState;

pub async fn cmd_top(state: &AppState, page: u32) -> anyhow::Result<()> {
    let outcome = state.catalog.load_top(page).await?;

    if outcome.is_applied() {
        print_page(&state.catalog.current(), &favorite_ids(&state.favorites));
    } else {
        report_outcome(&outcome);
    }

    Ok(())
}

pub async fn cmd_search(state: &AppState, query: &str, page: u32) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let outcome = state.catalog.search(query, page).await?;

    if outcome.is_applied() {
        let results = state.catalog.current();
        if results.is_empty() {
            println!("No anime found matching '{query}'");
            return Ok(());
        }
        print_page(&results, &favorite_ids(&state.favorites));
        println!();
        println!("To save one: animeshelf favorites add <id>");
    } else {
        report_outcome(&outcome);
    }

    Ok(())
}
