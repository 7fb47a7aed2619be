//! Paginated list building blocks.

mod controls;
mod state;

pub use controls::{ListFeedback, Pagination, SearchBox, SortHeader};
pub use state::{ListState, use_list};
