//! REST access layer.
//!
//! - [`Transport`] / [`HttpTransport`] - Raw request/response exchange
//! - [`ApiClient`] - Credentials, token renewal, envelopes, error normalization
//! - [`QueryClient`] - Cached reads and invalidating writes
//! - [`resources`] - Request bodies and non-CRUD endpoints

mod auth;
mod client;
#[cfg(test)]
pub(crate) mod mock;
mod query;
pub mod resources;
mod transport;

pub use auth::ProfileUpdate;
pub use client::{ApiClient, member_path};
pub use query::{QueryClient, folder_key};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
