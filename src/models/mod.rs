//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Session`], [`SessionAction`], [`Role`] - Authentication state
//! - [`NavigationEntry`] - Role-filterable sidebar tree
//! - [`ResourceQuery`], [`PaginatedResult`] - List request/response contract
//! - [`Folder`], [`FileLink`], [`User`], [`Activity`], [`Event`], [`Item`] - Server resources
//! - [`AppRoute`] - Hash-based navigation

mod navigation;
mod page;
mod query;
mod resource;
mod role;
mod route;
mod session;

pub use navigation::{NavIcon, NavigationEntry};
pub use page::{MutationResponse, PageLink, PageMeta, PaginatedResult, page_window};
pub use query::{QueryError, ResourceQuery, SortBy, SortType};
pub use resource::{Activity, Event, FileLink, Folder, FolderContents, Item, ResourceFamily, User};
pub use role::Role;
pub use route::AppRoute;
#[cfg(test)]
pub(crate) use session::sample_user;
pub use session::{AuthTokens, Session, SessionAction, UserProfile};
