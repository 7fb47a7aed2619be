//! Core business logic, independent of the browser.
//!
//! This module provides:
//! - [`access`] - Menu filtering, route lookup, route guard, access policy
//! - [`QueryCache`] - Query-identity cache with dedup and stale-discard
//! - [`Debouncer`] - Quiet-period coalescing of input events
//! - [`SessionStore`] - The session ownership seam
//! - [`validation`] - Client-side form rules

pub mod access;
mod cache;
mod debounce;
pub mod error;
mod session;
pub mod validation;

pub use access::{AccessPolicy, GuardInput, GuardOutcome, RouteRequirement, filter_menu};
pub use cache::{
    Completion, FetchPlan, QueryCache, QueryKey, QuerySnapshot, QueryStatus, Ticket,
};
pub use debounce::Debouncer;
pub use error::{ApiError, StorageError, ValidationErrors};
pub use session::SessionStore;
