//! Sidebar navigation tree.

use std::collections::BTreeSet;

use super::Role;

/// Semantic icon for a navigation entry, mapped to the icon theme in
/// `components::icons`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavIcon {
    Dashboard,
    Documents,
    Folder,
    File,
    Calendar,
    Admin,
    Users,
    Activity,
    Profile,
}

/// One node of the role-filterable menu tree.
///
/// An empty `allowed_roles` set means any authenticated role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEntry {
    pub title: String,
    pub target_path: Option<String>,
    pub icon: NavIcon,
    pub children: Vec<NavigationEntry>,
    pub allowed_roles: BTreeSet<Role>,
}

impl NavigationEntry {
    /// Leaf entry pointing at `path`, open to every role.
    pub fn link(title: impl Into<String>, path: impl Into<String>, icon: NavIcon) -> Self {
        Self {
            title: title.into(),
            target_path: Some(path.into()),
            icon,
            children: Vec::new(),
            allowed_roles: BTreeSet::new(),
        }
    }

    /// Group entry without a target of its own.
    pub fn group(title: impl Into<String>, icon: NavIcon, children: Vec<NavigationEntry>) -> Self {
        Self {
            title: title.into(),
            target_path: None,
            icon,
            children,
            allowed_roles: BTreeSet::new(),
        }
    }

    /// Restrict the entry to the given roles.
    pub fn roles(mut self, roles: &[Role]) -> Self {
        self.allowed_roles = roles.iter().copied().collect();
        self
    }

    /// Whether `role` satisfies this entry's own constraint.
    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first iterator over this entry and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &NavigationEntry> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let entry = stack.pop()?;
            stack.extend(entry.children.iter().rev());
            Some(entry)
        })
    }

    /// True if this entry or a descendant targets `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.walk()
            .any(|entry| entry.target_path.as_deref() == Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_empty_set_means_any() {
        let entry = NavigationEntry::link("Home", "/", NavIcon::Dashboard);
        assert!(entry.permits(Role::Admin));
        assert!(entry.permits(Role::User));
    }

    #[test]
    fn test_permits_restricted() {
        let entry = NavigationEntry::link("Users", "/users", NavIcon::Users).roles(&[Role::Admin]);
        assert!(entry.permits(Role::Admin));
        assert!(!entry.permits(Role::User));
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = NavigationEntry::group(
            "Docs",
            NavIcon::Documents,
            vec![
                NavigationEntry::link("Folders", "/folders", NavIcon::Folder),
                NavigationEntry::group(
                    "Nested",
                    NavIcon::Folder,
                    vec![NavigationEntry::link("Deep", "/deep", NavIcon::File)],
                ),
                NavigationEntry::link("Files", "/files", NavIcon::File),
            ],
        );
        let titles: Vec<_> = tree.walk().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Docs", "Folders", "Nested", "Deep", "Files"]);
        assert!(tree.contains_path("/deep"));
        assert!(!tree.contains_path("/missing"));
    }
}
