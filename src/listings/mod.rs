pub mod store;
pub mod types;

pub use store::load_listings;
pub use types::Listing;
