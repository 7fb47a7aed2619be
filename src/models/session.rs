//! Authentication session state.
//!
//! The session is owned by a single store and only changes through
//! [`SessionAction`]s applied by [`Session::reduce`]. Everything a component
//! needs to know about the current user is read through the selector methods
//! on [`Session`].

use serde::{Deserialize, Serialize};

use super::Role;

/// Access/refresh token pair issued by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
}

impl UserProfile {
    /// Name shown in the sidebar and header.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// The closed set of session transitions.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Credentials submitted, awaiting the server.
    LoginStarted,
    LoginSucceeded {
        tokens: AuthTokens,
        user: UserProfile,
    },
    LoginFailed(String),
    Logout,
    /// Access token renewed with the refresh token.
    RefreshSucceeded(AuthTokens),
    /// Refresh token rejected; the session is destroyed.
    RefreshFailed(String),
    SetTokens(AuthTokens),
    UpdateUser(UserProfile),
    ClearError,
    ClearAuth,
}

/// Snapshot of the client-side session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub error: Option<String>,
}

impl Session {
    /// Session restored from persisted tokens, pending a profile fetch.
    ///
    /// Stays in the loading state so route guards wait instead of redirecting.
    pub fn restoring(tokens: AuthTokens, user: Option<UserProfile>) -> Self {
        Self {
            user,
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            is_loading: true,
            error: None,
        }
    }

    /// True iff a non-empty access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Token pair, when both halves are present.
    pub fn tokens(&self) -> Option<AuthTokens> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() => Some(AuthTokens {
                access_token: access.clone(),
                refresh_token: refresh.clone(),
            }),
            _ => None,
        }
    }

    /// Apply one action, producing the next snapshot.
    pub fn reduce(self, action: SessionAction) -> Self {
        match action {
            SessionAction::LoginStarted => Self {
                is_loading: true,
                error: None,
                ..self
            },
            SessionAction::LoginSucceeded { tokens, user } => Self {
                user: Some(user),
                access_token: Some(tokens.access_token),
                refresh_token: Some(tokens.refresh_token),
                is_loading: false,
                error: None,
            },
            SessionAction::LoginFailed(message) => Self {
                error: Some(message),
                ..Self::default()
            },
            SessionAction::Logout | SessionAction::ClearAuth => Self::default(),
            SessionAction::RefreshSucceeded(tokens) | SessionAction::SetTokens(tokens) => {
                if tokens.access_token.is_empty() {
                    return Self::default();
                }
                Self {
                    access_token: Some(tokens.access_token),
                    refresh_token: Some(tokens.refresh_token),
                    ..self
                }
            }
            SessionAction::RefreshFailed(message) => Self {
                error: Some(message),
                ..Self::default()
            },
            SessionAction::UpdateUser(user) => Self {
                user: Some(user),
                is_loading: false,
                ..self
            },
            SessionAction::ClearError => Self {
                error: None,
                ..self
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user(role: Role) -> UserProfile {
    UserProfile {
        id: "u-1".to_string(),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        full_name: Some("Jane Doe".to_string()),
        role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(access: &str) -> AuthTokens {
        AuthTokens {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    fn logged_in(role: Role) -> Session {
        Session::default().reduce(SessionAction::LoginSucceeded {
            tokens: tokens("access"),
            user: sample_user(role),
        })
    }

    #[test]
    fn test_default_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
        assert_eq!(session.role(), None);
        assert_eq!(session.tokens(), None);
    }

    #[test]
    fn test_login_flow() {
        let session = Session::default().reduce(SessionAction::LoginStarted);
        assert!(session.is_loading);
        assert!(!session.is_authenticated());

        let session = session.reduce(SessionAction::LoginSucceeded {
            tokens: tokens("access"),
            user: sample_user(Role::Admin),
        });
        assert!(session.is_authenticated());
        assert!(!session.is_loading);
        assert!(session.is_admin());
        assert_eq!(session.user_id(), Some("u-1"));
    }

    #[test]
    fn test_login_failure_keeps_error_only() {
        let session = Session::default()
            .reduce(SessionAction::LoginStarted)
            .reduce(SessionAction::LoginFailed("Invalid credentials".into()));
        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
        assert_eq!(session.error.as_deref(), Some("Invalid credentials"));

        let session = session.reduce(SessionAction::ClearError);
        assert_eq!(session.error, None);
    }

    #[test]
    fn test_logout_destroys_session() {
        let session = logged_in(Role::User).reduce(SessionAction::Logout);
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_refresh_replaces_tokens_keeps_user() {
        let session = logged_in(Role::User).reduce(SessionAction::RefreshSucceeded(AuthTokens {
            access_token: "new-access".into(),
            refresh_token: "new-refresh".into(),
        }));
        assert_eq!(session.access_token.as_deref(), Some("new-access"));
        assert_eq!(session.refresh_token.as_deref(), Some("new-refresh"));
        assert_eq!(session.role(), Some(Role::User));
    }

    #[test]
    fn test_refresh_failure_clears_auth() {
        let session = logged_in(Role::Admin).reduce(SessionAction::RefreshFailed("expired".into()));
        assert!(!session.is_authenticated());
        assert_eq!(session.user, None);
        assert_eq!(session.error.as_deref(), Some("expired"));
    }

    #[test]
    fn test_empty_access_token_is_not_authenticated() {
        let session = logged_in(Role::User).reduce(SessionAction::SetTokens(tokens("")));
        assert!(!session.is_authenticated());
        assert_eq!(session.access_token, None);
    }

    #[test]
    fn test_restoring_waits_for_profile() {
        let session = Session::restoring(tokens("access"), None);
        assert!(session.is_authenticated());
        assert!(session.is_loading);
        assert_eq!(session.role(), None);

        let session = session.reduce(SessionAction::UpdateUser(sample_user(Role::User)));
        assert!(!session.is_loading);
        assert_eq!(session.role(), Some(Role::User));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = sample_user(Role::User);
        assert_eq!(user.display_name(), "Jane Doe");
        user.full_name = Some("  ".into());
        assert_eq!(user.display_name(), "jdoe");
        user.full_name = None;
        assert_eq!(user.display_name(), "jdoe");
    }

    #[test]
    fn test_persisted_form_skips_transient_fields() {
        let mut session = logged_in(Role::User);
        session.error = Some("boom".into());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("boom"));
        assert!(!json.contains("is_loading"));
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.tokens(), session.tokens());
        assert_eq!(restored.error, None);
    }
}
