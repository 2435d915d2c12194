mod browse;
mod favorites;
mod info;
mod render;
mod top;

pub use browse::cmd_browse;
pub use favorites::{
    cmd_favorites_add, cmd_favorites_clear, cmd_favorites_list, cmd_favorites_remove,
};
pub use info::cmd_info;
pub use top::{cmd_search, cmd_top};
