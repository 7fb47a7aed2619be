//! Hash-based routing.
//!
//! URL format: `#/path[?query]`, e.g. `#/folders/abc`, `#/login?from=%2Fusers`.

use crate::utils::url::{decode_component, encode_component};

/// Application routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    /// `#/`
    Dashboard,
    /// `#/login`, optionally remembering where to return after sign-in.
    Login { from: Option<String> },
    /// `#/unauthorized`
    Unauthorized,
    /// `#/folders`
    Folders,
    /// `#/folders/:id`
    Folder { id: String },
    /// `#/files`
    Files,
    /// `#/users`
    Users,
    /// `#/activities`
    Activities,
    /// `#/events`
    Events,
    /// `#/profile`
    Profile,
    /// Anything else; carries the requested path.
    NotFound(String),
}

impl AppRoute {
    /// Parse a location such as `/folders/abc` or `#/login?from=/users`.
    pub fn parse(location: &str) -> Self {
        let location = location.trim_start_matches('#');
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = normalize_path(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login {
                from: query_param(query, "from").filter(|from| from.starts_with('/')),
            },
            ["unauthorized"] => Self::Unauthorized,
            ["folders"] => Self::Folders,
            ["folders", id] => Self::Folder {
                id: decode_component(id),
            },
            ["files"] => Self::Files,
            ["users"] => Self::Users,
            ["activities"] => Self::Activities,
            ["events"] => Self::Events,
            ["profile"] => Self::Profile,
            _ => Self::NotFound(path),
        }
    }

    /// Path without the query string, as matched by the access policy.
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Login { .. } => "/login".to_string(),
            Self::Unauthorized => "/unauthorized".to_string(),
            Self::Folders => "/folders".to_string(),
            Self::Folder { id } => format!("/folders/{}", encode_component(id)),
            Self::Files => "/files".to_string(),
            Self::Users => "/users".to_string(),
            Self::Activities => "/activities".to_string(),
            Self::Events => "/events".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Full location including the query string.
    pub fn location(&self) -> String {
        match self {
            Self::Login { from: Some(from) } => {
                format!("/login?from={}", encode_component(from))
            }
            _ => self.path(),
        }
    }

    pub fn to_hash(&self) -> String {
        format!("#{}", self.location())
    }

    /// Login route that returns to `from` after sign-in.
    pub fn login_from(from: &str) -> Self {
        let from = (from.starts_with('/') && !from.starts_with("/login")).then(|| from.to_string());
        Self::Login { from }
    }

    /// Get current route from browser URL.
    pub fn current() -> Self {
        Self::parse(&crate::utils::dom::get_hash())
    }

    /// Navigate to this route (adds a history entry).
    pub fn push(&self) {
        crate::utils::dom::set_hash(&self.to_hash());
    }

    /// Navigate without adding a history entry, for redirects.
    pub fn replace(&self) {
        crate::utils::dom::replace_hash(&self.to_hash());
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| decode_component(v))
        .filter(|v| !v.is_empty())
}
