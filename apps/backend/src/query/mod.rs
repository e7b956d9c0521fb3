pub mod filter;
pub mod search;

pub use filter::{and_all, build, try_build, FilterError, FilterValue, SearchQuery};
pub use search::{IntoSearchQuery, ItemSearch, Pagination, UserSearch};
