//! Browser and formatting helpers.
//!
//! Provides:
//! - [`dom`] - Window, storage, dialogs, and hash navigation access
//! - [`format`] - Display formatting for sizes and dates
//! - [`logging`] - `tracing` subscriber writing to the browser console
//! - [`storage`] - Session persistence in localStorage
//! - [`url`] - URL validation and query-string encoding

pub mod dom;
pub mod format;
pub mod logging;
pub mod storage;
pub mod url;
