//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! Deployment-specific values can be overridden at compile time through
//! environment variables read with `option_env!`.

use crate::core::{AccessPolicy, RouteRequirement};
use crate::core::access::{LOGIN_PATH, UNAUTHORIZED_PATH};
use crate::models::{NavIcon, NavigationEntry, Role};

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name shown in the sidebar and page titles.
pub const APP_NAME: &str = "DocVault";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Network Configuration
// =============================================================================

/// Base URL of the REST API. Override with `DOCVAULT_API_URL` at build time.
pub const API_BASE_URL: &str = match option_env!("DOCVAULT_API_URL") {
    Some(url) => url,
    None => "/api",
};

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: u32 = 15_000;

// =============================================================================
// Logging
// =============================================================================

/// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`).
/// Override with `DOCVAULT_LOG` at build time.
pub const LOG_LEVEL: &str = match option_env!("DOCVAULT_LOG") {
    Some(level) => level,
    None if cfg!(debug_assertions) => "debug",
    None => "info",
};

// =============================================================================
// Session Persistence
// =============================================================================

/// localStorage key for the persisted session (tokens and cached profile).
pub const SESSION_STORAGE_KEY: &str = "docvault.session";

// =============================================================================
// Lists and Queries
// =============================================================================

/// List query defaults.
pub mod query {
    /// Page size used when a list does not choose one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Page sizes offered in list footers.
    pub const PAGE_SIZE_OPTIONS: &[u32] = &[10, 20, 50, 100];
    /// Quiet period before a search term is sent.
    pub const SEARCH_DEBOUNCE_MS: u64 = 500;
    /// Neighbour pages shown on each side of the current page.
    pub const PAGINATION_RADIUS: u32 = 1;
    /// Activities are denser; the log shows more rows per page.
    pub const ACTIVITY_PAGE_SIZE: u32 = 20;
    /// Items shown in each dashboard panel.
    pub const DASHBOARD_PAGE_SIZE: u32 = 5;
    /// Cached results kept once no view shows them.
    pub const CACHE_CAPACITY: usize = 32;
}

// =============================================================================
// UI Configuration
// =============================================================================

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u32 = 4_000;

/// Maximum toasts shown at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;

// =============================================================================
// Navigation and Access
// =============================================================================

/// The sidebar navigation tree.
///
/// This is also the source of route permissions: see [`access_policy`].
pub fn navigation() -> Vec<NavigationEntry> {
    vec![
        NavigationEntry::link("Dashboard", "/", NavIcon::Dashboard),
        NavigationEntry::group(
            "Documents",
            NavIcon::Documents,
            vec![
                NavigationEntry::link("Folders", "/folders", NavIcon::Folder),
                NavigationEntry::link("Files", "/files", NavIcon::File),
            ],
        ),
        NavigationEntry::link("Calendar", "/events", NavIcon::Calendar),
        NavigationEntry::group(
            "Administration",
            NavIcon::Admin,
            vec![
                NavigationEntry::link("Users", "/users", NavIcon::Users),
                NavigationEntry::link("Activity Log", "/activities", NavIcon::Activity),
            ],
        )
        .roles(&[Role::Admin]),
        NavigationEntry::link("Profile", "/profile", NavIcon::Profile),
    ]
}

/// Route permissions: the navigation tree plus routes that have no menu entry.
pub fn access_policy() -> AccessPolicy {
    AccessPolicy::from_navigation(&navigation())
        .with_rule(LOGIN_PATH, RouteRequirement::public())
        .with_rule(UNAUTHORIZED_PATH, RouteRequirement::default())
        .with_rule("/folders/:id", RouteRequirement::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GuardInput, GuardOutcome};
    use crate::models::AppRoute;

    fn signed_in(role: Role) -> GuardInput {
        GuardInput {
            is_authenticated: true,
            is_loading: false,
            role: Some(role),
        }
    }

    #[test]
    fn test_every_menu_path_is_a_route() {
        for entry in navigation().iter().flat_map(NavigationEntry::walk) {
            if let Some(path) = &entry.target_path {
                assert!(
                    !matches!(AppRoute::parse(path), AppRoute::NotFound(_)),
                    "{} has no route",
                    path
                );
            }
        }
    }

    #[test]
    fn test_admin_routes_are_restricted() {
        let policy = access_policy();
        for path in ["/users", "/activities"] {
            assert_eq!(
                policy.evaluate(signed_in(Role::User), path),
                GuardOutcome::RedirectUnauthorized
            );
            assert_eq!(policy.evaluate(signed_in(Role::Admin), path), GuardOutcome::Render);
        }
    }

    #[test]
    fn test_shared_routes() {
        let policy = access_policy();
        for path in ["/", "/folders", "/folders/abc", "/files", "/events", "/profile"] {
            assert_eq!(policy.evaluate(signed_in(Role::User), path), GuardOutcome::Render);
        }
    }

    #[test]
    fn test_login_is_public() {
        let anonymous = GuardInput {
            is_authenticated: false,
            is_loading: false,
            role: None,
        };
        assert_eq!(access_policy().evaluate(anonymous, LOGIN_PATH), GuardOutcome::Render);
    }

    #[test]
    fn test_query_defaults() {
        assert!(query::PAGE_SIZE_OPTIONS.contains(&query::DEFAULT_PAGE_SIZE));
        assert!(query::PAGE_SIZE_OPTIONS.contains(&query::ACTIVITY_PAGE_SIZE));
        assert_eq!(query::SEARCH_DEBOUNCE_MS, 500);
    }
}
