//! Authenticated REST client.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! current access token, renews it once on a 401 and normalizes failures into
//! [`ApiError`]. Typed helpers decode the list and mutation envelopes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ApiRequest, ApiResponse, Transport};
use crate::core::{ApiError, SessionStore};
use crate::models::{
    AuthTokens, MutationResponse, PaginatedResult, ResourceFamily, ResourceQuery, SessionAction,
};

/// REST client bound to a transport and a session store.
pub struct ApiClient<T, S> {
    transport: T,
    session: S,
    /// Held while a token refresh is in flight.
    refreshing: Mutex<()>,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    pub fn new(transport: T, session: S) -> Self {
        Self {
            transport,
            session,
            refreshing: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Send `request` with credentials and return the 2xx response.
    ///
    /// On a 401 the access token is renewed with the refresh token and the
    /// request is retried exactly once. Only one refresh runs at a time:
    /// requests rejected concurrently wait for it and retry with its token.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.anonymous {
            return self.send(&request).await.and_then(ensure_success);
        }

        let sent = self.session.access_token();
        request.bearer = sent.clone();
        let response = self.send(&request).await?;
        if response.status != 401 || sent.is_none() {
            return ensure_success(response);
        }

        let Some(token) = self.renewed_token(sent.as_deref()).await else {
            return ensure_success(response);
        };
        request.bearer = Some(token);
        debug!(path = %request.path, "retrying with renewed token");
        self.send(&request).await.and_then(ensure_success)
    }

    /// Access token to retry with after `rejected` got a 401.
    ///
    /// If the token changed while this request waited for the lock, another
    /// request already refreshed and its token is reused. `None` means the
    /// session is gone or the refresh failed.
    async fn renewed_token(&self, rejected: Option<&str>) -> Option<String> {
        let _guard = self.refreshing.lock().await;
        match self.session.access_token() {
            Some(current) if Some(current.as_str()) != rejected => Some(current),
            Some(_) => self.refresh().await.ok().map(|tokens| tokens.access_token),
            None => None,
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let result = self.transport.send(request).await;
        match &result {
            Ok(response) if !response.is_success() => {
                debug!(status = response.status, path = %request.path, "request rejected")
            }
            Err(e) => warn!(path = %request.path, "transport failure: {}", e),
            Ok(_) => {}
        }
        result
    }

    /// Exchange the refresh token for a new token pair.
    ///
    /// A rejected refresh destroys the session via
    /// [`SessionAction::RefreshFailed`]. Network failures leave it untouched.
    pub async fn refresh(&self) -> Result<AuthTokens, ApiError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            let error = ApiError::from_response(401, "");
            self.session
                .dispatch(SessionAction::RefreshFailed(error.message()));
            return Err(error);
        };

        let request = ApiRequest::post(
            "/auth/refresh",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .anonymous();
        let result = match self.send(&request).await.and_then(ensure_success) {
            Ok(response) => decode_payload::<AuthTokens>(&response.body),
            Err(e) => Err(e),
        };

        match result {
            Ok(tokens) if !tokens.access_token.is_empty() => {
                info!("access token renewed");
                self.session
                    .dispatch(SessionAction::RefreshSucceeded(tokens.clone()));
                Ok(tokens)
            }
            Ok(_) => {
                let error = ApiError::Decode("empty access token".to_string());
                self.session
                    .dispatch(SessionAction::RefreshFailed(error.message()));
                Err(error)
            }
            Err(error @ ApiError::Network(_)) => Err(error),
            Err(error) => {
                warn!("token refresh rejected: {}", error);
                self.session
                    .dispatch(SessionAction::RefreshFailed(error.message()));
                Err(error)
            }
        }
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// GET a single object, unwrapping an optional `{ data }` envelope.
    pub async fn fetch<R: DeserializeOwned>(&self, path: impl Into<String>) -> Result<R, ApiError> {
        let response = self.execute(ApiRequest::get(path)).await?;
        decode_payload(&response.body)
    }

    /// GET one page of a collection.
    ///
    /// The query is validated before anything is sent, and the returned
    /// metadata is normalized for empty collections.
    pub async fn list<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &ResourceQuery,
    ) -> Result<PaginatedResult<R>, ApiError> {
        query.validate()?;
        let request = ApiRequest::get(path).with_query(query.to_params());
        let response = self.execute(request).await?;
        decode::<PaginatedResult<R>>(&response.body).map(PaginatedResult::normalized)
    }

    /// Run a create/update/delete request and decode its envelope.
    ///
    /// An empty 2xx body (e.g. `204 No Content`) is an empty envelope.
    pub async fn mutate<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<MutationResponse<R>, ApiError> {
        let response = self.execute(request).await?;
        if response.body.trim().is_empty() {
            return Ok(MutationResponse {
                message: String::new(),
                data: None,
            });
        }
        decode(&response.body)
    }

    pub async fn create<R: DeserializeOwned>(
        &self,
        family: ResourceFamily,
        input: &impl Serialize,
    ) -> Result<MutationResponse<R>, ApiError> {
        let body = super::resources::body(input)?;
        self.mutate(ApiRequest::post(family.path(), body)).await
    }

    pub async fn update<R: DeserializeOwned>(
        &self,
        family: ResourceFamily,
        id: &str,
        input: &impl Serialize,
    ) -> Result<MutationResponse<R>, ApiError> {
        let body = super::resources::body(input)?;
        self.mutate(ApiRequest::patch(member_path(family, id), body))
            .await
    }

    pub async fn remove(
        &self,
        family: ResourceFamily,
        id: &str,
    ) -> Result<MutationResponse, ApiError> {
        self.mutate(ApiRequest::delete(member_path(family, id))).await
    }
}

/// `/family/:id`
pub fn member_path(family: ResourceFamily, id: &str) -> String {
    format!(
        "{}/{}",
        family.path(),
        crate::utils::url::encode_component(id)
    )
}

fn ensure_success(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a single-object body, accepting both `{ "data": {...} }` and the
/// bare object.
pub(crate) fn decode_payload<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    let value: serde_json::Value = decode(body)?;
    let payload = match value {
        serde_json::Value::Object(mut map)
            if map.get("data").is_some_and(serde_json::Value::is_object) =>
        {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}
