//! CLI module - Command-line interface for `AnimeShelf`
//!
//! Every subcommand goes through the same controllers the interactive
//! browser uses, so a one-shot `top` behaves exactly like pressing keys.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::AnimeId;
use crate::state::AppState;

/// `AnimeShelf` - Browse the anime catalog and keep a shelf of favorites
#[derive(Parser)]
#[command(name = "animeshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a page of the top-ranked anime
    #[command(alias = "t")]
    Top {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Search the catalog by title
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show details about an anime
    #[command(alias = "i")]
    Info {
        /// Anime ID
        id: AnimeId,
    },

    /// Manage favorites
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },

    /// Browse interactively (n/p to page, s to search, f to toggle a favorite)
    #[command(alias = "b")]
    Browse,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum FavoriteCommands {
    /// List all favorites
    #[command(alias = "ls")]
    List,
    /// Save an anime as a favorite
    Add {
        /// Anime ID
        id: AnimeId,
    },
    /// Remove an anime from favorites
    #[command(alias = "rm")]
    Remove {
        /// Anime ID
        id: AnimeId,
    },
    /// Remove every favorite
    Clear,
}

pub async fn dispatch(state: &AppState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Top { page } => commands::cmd_top(state, page).await,
        Commands::Search { query, page } => {
            commands::cmd_search(state, &query.join(" "), page).await
        }
        Commands::Info { id } => commands::cmd_info(state, id).await,
        Commands::Favorites { command } => match command {
            FavoriteCommands::List => commands::cmd_favorites_list(state),
            FavoriteCommands::Add { id } => commands::cmd_favorites_add(state, id).await,
            FavoriteCommands::Remove { id } => commands::cmd_favorites_remove(state, id).await,
            FavoriteCommands::Clear => commands::cmd_favorites_clear(state).await,
        },
        Commands::Browse => commands::cmd_browse(state).await,
        // Handled before any state is built.
        Commands::Init => Ok(()),
    }
}
