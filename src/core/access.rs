//! Role-based access control.
//!
//! Three pure functions decide what a role may see and reach:
//!
//! - [`filter_menu`] prunes the navigation tree for the sidebar
//! - [`can_access_route`] looks up an exact menu path
//! - [`evaluate_guard`] decides whether a route renders, waits, or redirects
//!
//! [`AccessPolicy`] ties them together: it is built from the navigation tree
//! plus pattern entries for dynamic routes, so the menu and the router read
//! the same table.

use crate::models::{NavigationEntry, Role, Session};

// =============================================================================
// Menu Filtering
// =============================================================================

/// Prune `entries` to what `role` may see.
///
/// Children are filtered before their parent. An entry survives when its own
/// `allowed_roles` admits `role`; a parent that had children survives only if
/// at least one child does. Relative order is preserved.
pub fn filter_menu(entries: &[NavigationEntry], role: Role) -> Vec<NavigationEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let children = filter_menu(&entry.children, role);
            if !entry.permits(role) || (entry.has_children() && children.is_empty()) {
                return None;
            }
            Some(NavigationEntry {
                children,
                ..entry.clone()
            })
        })
        .collect()
}

/// Outcome of an exact menu-path lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    Allowed,
    Denied,
    /// No menu entry targets the path. Dynamic routes such as
    /// `/folders/:id` always land here and are left to the route guard.
    NotFound,
}

/// Check `role` against the first entry (depth first) whose `target_path`
/// equals `path`.
pub fn can_access_route(path: &str, role: Role, entries: &[NavigationEntry]) -> RouteAccess {
    entries
        .iter()
        .flat_map(NavigationEntry::walk)
        .find(|entry| entry.target_path.as_deref() == Some(path))
        .map_or(RouteAccess::NotFound, |entry| {
            if entry.permits(role) {
                RouteAccess::Allowed
            } else {
                RouteAccess::Denied
            }
        })
}

// =============================================================================
// Route Guard
// =============================================================================

/// Default login path for unauthenticated redirects.
pub const LOGIN_PATH: &str = "/login";

/// Path shown when an authenticated role is refused.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Per-route guard configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRequirement {
    pub require_auth: bool,
    /// Empty means any authenticated role.
    pub required_roles: Vec<Role>,
    pub fallback_path: String,
}

impl Default for RouteRequirement {
    fn default() -> Self {
        Self {
            require_auth: true,
            required_roles: Vec::new(),
            fallback_path: LOGIN_PATH.to_string(),
        }
    }
}

impl RouteRequirement {
    /// Reachable without signing in.
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    /// Signed in with one of `roles`.
    pub fn roles(roles: &[Role]) -> Self {
        Self {
            required_roles: roles.to_vec(),
            ..Self::default()
        }
    }
}

/// Session facts the guard needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuardInput {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub role: Option<Role>,
}

impl From<&Session> for GuardInput {
    fn from(session: &Session) -> Self {
        Self {
            is_authenticated: session.is_authenticated(),
            is_loading: session.is_loading,
            role: session.role(),
        }
    }
}

/// What the router should do with a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not yet known; show a neutral loading state.
    Loading,
    Render,
    /// Send the user to `to`, remembering `from` for the post-login return.
    RedirectToLogin { to: String, from: String },
    RedirectUnauthorized,
}

/// Decide the outcome of visiting `location` under `requirement`.
pub fn evaluate_guard(
    session: GuardInput,
    requirement: &RouteRequirement,
    location: &str,
) -> GuardOutcome {
    if !requirement.require_auth {
        return GuardOutcome::Render;
    }
    if session.is_loading {
        return GuardOutcome::Loading;
    }
    if !session.is_authenticated {
        return GuardOutcome::RedirectToLogin {
            to: requirement.fallback_path.clone(),
            from: location.to_string(),
        };
    }
    if requirement.required_roles.is_empty() {
        return GuardOutcome::Render;
    }
    match session.role {
        Some(role) if requirement.required_roles.contains(&role) => GuardOutcome::Render,
        _ => GuardOutcome::RedirectUnauthorized,
    }
}

// =============================================================================
// Access Policy
// =============================================================================

/// A route pattern such as `/folders/:id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| {
                if s.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let mut parts = split_path(path);
        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Literal(lit), Some(part)) if lit == part => {}
                (Segment::Param, Some(_)) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }

    fn is_exact(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Single authorization table for menu visibility and route reachability.
///
/// A rule without a requirement marks a path no role can reach.
#[derive(Clone, Debug, Default)]
pub struct AccessPolicy {
    rules: Vec<(RoutePattern, Option<RouteRequirement>)>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with every `target_path` in the navigation tree.
    ///
    /// A path is reachable by exactly the roles whose filtered menu still
    /// shows its entry: the entry and all its ancestors must admit the role,
    /// and an entry with children must keep at least one of them.
    pub fn from_navigation(entries: &[NavigationEntry]) -> Self {
        let mut policy = Self::new();
        for entry in entries {
            policy.collect(entry, &Role::ALL);
        }
        policy
    }

    fn collect(&mut self, entry: &NavigationEntry, inherited: &[Role]) {
        let effective: Vec<Role> = inherited
            .iter()
            .copied()
            .filter(|role| survives(entry, *role))
            .collect();
        if let Some(path) = &entry.target_path {
            let requirement = match effective.len() {
                0 => None,
                n if n == Role::ALL.len() => Some(RouteRequirement::default()),
                _ => Some(RouteRequirement::roles(&effective)),
            };
            self.rules.push((RoutePattern::parse(path), requirement));
        }
        for child in &entry.children {
            self.collect(child, &effective);
        }
    }

    /// Add a rule for a pattern, typically a dynamic or non-menu route.
    pub fn with_rule(mut self, pattern: &str, requirement: RouteRequirement) -> Self {
        self.rules
            .push((RoutePattern::parse(pattern), Some(requirement)));
        self
    }

    /// Exact rules win over patterns; among rules of the same kind the first
    /// added wins.
    fn rule_for(&self, path: &str) -> Option<&Option<RouteRequirement>> {
        let matching = || self.rules.iter().filter(|(p, _)| p.matches(path));
        matching()
            .find(|(p, _)| p.is_exact())
            .or_else(|| matching().next())
            .map(|(_, requirement)| requirement)
    }

    /// Requirement for `path`, or `None` if no rule matches or no role may
    /// reach it.
    pub fn requirement_for(&self, path: &str) -> Option<&RouteRequirement> {
        self.rule_for(path).and_then(Option::as_ref)
    }

    /// Guard decision for `path`. Unknown paths require authentication only.
    pub fn evaluate(&self, session: GuardInput, path: &str) -> GuardOutcome {
        let fallback = RouteRequirement::default();
        match self.rule_for(path) {
            None => evaluate_guard(session, &fallback, path),
            Some(Some(requirement)) => evaluate_guard(session, requirement, path),
            Some(None) => match evaluate_guard(session, &fallback, path) {
                GuardOutcome::Render => GuardOutcome::RedirectUnauthorized,
                other => other,
            },
        }
    }
}

/// Mirror of the [`filter_menu`] rule for a single entry.
fn survives(entry: &NavigationEntry, role: Role) -> bool {
    entry.permits(role)
        && (!entry.has_children() || entry.children.iter().any(|c| survives(c, role)))
}
