//! Auth endpoints.
//!
//! These are the only calls that change who is signed in; each one reports
//! its outcome to the session store.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::client::decode_payload;
use super::{ApiClient, ApiRequest, Transport};
use crate::core::{ApiError, SessionStore};
use crate::models::{AuthTokens, MutationResponse, SessionAction, UserProfile};

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(flatten)]
    tokens: AuthTokens,
    user: UserProfile,
}

/// Editable profile fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// Exchange credentials for a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ApiError> {
        self.session().dispatch(SessionAction::LoginStarted);

        let request = ApiRequest::post(
            "/auth/login",
            serde_json::json!({ "username": username.trim(), "password": password }),
        )
        .anonymous();
        let result = match self.execute(request).await {
            Ok(response) => decode_payload::<LoginPayload>(&response.body),
            Err(e) => Err(e),
        };

        match result {
            Ok(payload) => {
                info!(user = %payload.user.username, "signed in");
                let user = payload.user.clone();
                self.session().dispatch(SessionAction::LoginSucceeded {
                    tokens: payload.tokens,
                    user: payload.user,
                });
                Ok(user)
            }
            Err(error) => {
                warn!("sign-in failed: {}", error);
                self.session()
                    .dispatch(SessionAction::LoginFailed(error.message()));
                Err(error)
            }
        }
    }

    /// End the session. The server call is best-effort; the local session is
    /// always cleared.
    pub async fn logout(&self) {
        let mut request = ApiRequest::post("/auth/logout", serde_json::json!({})).anonymous();
        request.bearer = self.session().access_token();
        if request.bearer.is_some()
            && let Err(e) = self.execute(request).await
        {
            warn!("logout request failed: {}", e);
        }
        self.session().dispatch(SessionAction::Logout);
        info!("signed out");
    }

    /// Load the signed-in user's profile, completing a restored session.
    ///
    /// A network failure keeps a restored session alive when a cached
    /// profile exists; otherwise the session cannot be trusted and is cleared.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        match self.fetch::<UserProfile>("/auth/profile").await {
            Ok(user) => {
                self.session()
                    .dispatch(SessionAction::UpdateUser(user.clone()));
                Ok(user)
            }
            Err(error) => {
                let snapshot = self.session().snapshot();
                let authenticated = snapshot.is_authenticated();
                match (&error, snapshot.user) {
                    // Refresh failure already ended the session.
                    _ if !authenticated => {}
                    (ApiError::Network(_), Some(cached)) => {
                        self.session().dispatch(SessionAction::UpdateUser(cached))
                    }
                    _ => self.session().dispatch(SessionAction::ClearAuth),
                }
                Err(error)
            }
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response: MutationResponse<UserProfile> = self
            .mutate(ApiRequest::patch("/auth/profile", body))
            .await?;
        let user = match response.data {
            Some(user) => user,
            None => self.fetch::<UserProfile>("/auth/profile").await?,
        };
        self.session()
            .dispatch(SessionAction::UpdateUser(user.clone()));
        Ok(user)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let request = ApiRequest::patch(
            "/auth/change-password",
            serde_json::json!({
                "current_password": current_password,
                "new_password": new_password,
            }),
        );
        let response: MutationResponse = self.mutate(request).await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{MockTransport, user_json};
    use crate::models::{Role, Session};

    fn setup() -> (Rc<MockTransport>, Rc<RefCell<Session>>) {
        (
            Rc::new(MockTransport::new()),
            Rc::new(RefCell::new(Session::default())),
        )
    }

    fn tokens() -> AuthTokens {
        AuthTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let (transport, session) = setup();
        let mut body = json!({ "access_token": "a", "refresh_token": "r" });
        body["user"] = user_json();
        transport.push(200, json!({ "message": "Login successful", "data": body }));
        let api = ApiClient::new(transport.clone(), session.clone());

        let user = api.login(" jdoe ", "secret").await.unwrap();
        assert_eq!(user.role, Role::User);

        let snapshot = session.snapshot();
        assert!(snapshot.is_authenticated());
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.user_id(), Some("u1"));

        let sent = &transport.requests()[0];
        assert!(sent.anonymous);
        assert_eq!(
            sent.body.as_ref().and_then(|b| b.get("username")).and_then(|v| v.as_str()),
            Some("jdoe")
        );
    }

    #[tokio::test]
    async fn test_login_failure_records_error() {
        let (transport, session) = setup();
        transport.push(401, json!({ "message": "Invalid credentials" }));
        let api = ApiClient::new(transport.clone(), session.clone());

        assert!(api.login("jdoe", "wrong").await.is_err());
        let snapshot = session.snapshot();
        assert!(!snapshot.is_authenticated());
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.error.as_deref(), Some("Invalid credentials"));
        // No refresh attempt for bad credentials.
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_logout_always_clears_session() {
        let (transport, session) = setup();
        session.dispatch(SessionAction::SetTokens(tokens()));
        transport.push_error(ApiError::Network("offline".into()));
        let api = ApiClient::new(transport.clone(), session.clone());

        api.logout().await;
        assert!(!session.snapshot().is_authenticated());
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_fetch_profile_completes_restore() {
        let (transport, session) = setup();
        session.replace(Session::restoring(tokens(), None));
        transport.push(200, json!({ "data": user_json() }));
        let api = ApiClient::new(transport.clone(), session.clone());

        api.fetch_profile().await.unwrap();
        let snapshot = session.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.role(), Some(Role::User));
    }

    #[tokio::test]
    async fn test_fetch_profile_offline_keeps_cached_user() {
        let (transport, session) = setup();
        let cached: UserProfile = serde_json::from_value(user_json()).unwrap();
        session.replace(Session::restoring(tokens(), Some(cached)));
        transport.push_error(ApiError::Network("offline".into()));
        let api = ApiClient::new(transport.clone(), session.clone());

        assert!(api.fetch_profile().await.is_err());
        let snapshot = session.snapshot();
        assert!(snapshot.is_authenticated());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_fetch_profile_server_error_clears_session() {
        let (transport, session) = setup();
        session.replace(Session::restoring(tokens(), None));
        transport.push(500, json!({}));
        let api = ApiClient::new(transport.clone(), session.clone());

        assert!(api.fetch_profile().await.is_err());
        assert_eq!(session.snapshot(), Session::default());
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_user() {
        let (transport, session) = setup();
        session.dispatch(SessionAction::SetTokens(tokens()));
        let mut updated = user_json();
        updated["full_name"] = json!("Jane Q. Doe");
        transport.push(200, json!({ "message": "Profile updated", "data": updated }));
        let api = ApiClient::new(transport.clone(), session.clone());

        let update = ProfileUpdate {
            email: "jdoe@example.com".into(),
            full_name: Some("Jane Q. Doe".into()),
        };
        let user = api.update_profile(&update).await.unwrap();
        assert_eq!(user.display_name(), "Jane Q. Doe");
        assert_eq!(
            session.snapshot().user.map(|u| u.display_name().to_string()).as_deref(),
            Some("Jane Q. Doe")
        );
    }

    #[tokio::test]
    async fn test_change_password_returns_message() {
        let (transport, session) = setup();
        session.dispatch(SessionAction::SetTokens(tokens()));
        transport.push(200, json!({ "message": "Password changed" }));
        let api = ApiClient::new(transport.clone(), session.clone());

        let message = api.change_password("old-password", "new-password").await.unwrap();
        assert_eq!(message, "Password changed");
        assert_eq!(transport.requests()[0].path, "/auth/change-password");
    }
}
