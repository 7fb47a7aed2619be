//! UI components built with Leptos.
//!
//! - [`router`] - Hash routing and the route guard (main entry point)
//! - [`layout`] - Sidebar navigation and top bar
//! - [`list`] - Paginated list hook, search, sorting, and pagination controls
//! - [`modal`] - Dialogs and form fields
//! - [`pages`] - One component per route
//! - [`toast`] - Transient notifications
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod icons;
pub mod layout;
pub mod list;
pub mod modal;
pub mod pages;
pub mod router;
pub mod toast;

pub use router::AppRouter;
