pub mod filter;
pub mod storage;
pub mod types;

pub use filter::{filter_active_listings, filter_dismissed_listings};
pub use storage::{get_dismiss_path, load_dismiss_state, save_dismiss_state};
pub use types::DismissState;
