//! Request bodies and resource-specific endpoints.
//!
//! Plain CRUD goes through [`ApiClient::create`], [`ApiClient::update`] and
//! [`ApiClient::remove`]; this module adds the payload types and the
//! endpoints that do not fit that shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::client::{decode_payload, member_path};
use super::{ApiClient, ApiRequest, Transport};
use crate::core::validation::UserForm;
use crate::core::{ApiError, SessionStore};
use crate::models::{FileLink, Folder, FolderContents, MutationResponse, ResourceFamily, Role};

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Folder create/update body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FolderInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl FolderInput {
    pub fn new(name: &str, description: &str, parent_id: Option<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            description: non_blank(description),
            parent_id,
        }
    }
}

/// File link create/update body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FileLinkInput {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileLinkInput {
    pub fn new(name: &str, url: &str, folder_id: Option<String>, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            url: url.trim().to_string(),
            folder_id,
            description: non_blank(description),
        }
    }
}

/// User create/update body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Omitted on update to keep the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

impl UserInput {
    /// Build from a validated form; `None` when the role is missing.
    pub fn from_form(form: &UserForm) -> Option<Self> {
        Some(Self {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            full_name: non_blank(&form.full_name),
            password: (!form.password.is_empty()).then(|| form.password.clone()),
            role: form.role?,
        })
    }
}

/// Calendar event create/update body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub all_day: bool,
}

/// Serialize a request body.
pub fn body<B: Serialize>(input: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// A folder with its child folders and files.
    pub async fn folder_contents(&self, id: &str) -> Result<FolderContents, ApiError> {
        let response = self
            .execute(ApiRequest::get(member_path(ResourceFamily::Folders, id)))
            .await?;
        let value: serde_json::Value = decode_payload(&response.body)?;
        FolderContents::ingest(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Re-parent a folder; `None` moves it to the root.
    pub async fn move_folder(
        &self,
        id: &str,
        parent_id: Option<&str>,
    ) -> Result<MutationResponse<Folder>, ApiError> {
        if parent_id == Some(id) {
            return Err(ApiError::Server {
                status: 400,
                message: "A folder cannot be moved into itself".to_string(),
            });
        }
        let path = format!("{}/move", member_path(ResourceFamily::Folders, id));
        self.mutate(ApiRequest::patch(
            path,
            serde_json::json!({ "parent_id": parent_id }),
        ))
        .await
    }

    /// Move a file to another folder; `None` detaches it from any folder.
    pub async fn move_file(
        &self,
        id: &str,
        folder_id: Option<&str>,
    ) -> Result<MutationResponse<FileLink>, ApiError> {
        let path = format!("{}/move", member_path(ResourceFamily::Files, id));
        self.mutate(ApiRequest::patch(
            path,
            serde_json::json!({ "folder_id": folder_id }),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{MockTransport, folder_json};
    use crate::models::{AuthTokens, Item, Session, SessionAction};

    fn client(transport: &Rc<MockTransport>) -> ApiClient<Rc<MockTransport>, Rc<RefCell<Session>>> {
        let session = Rc::new(RefCell::new(Session::default()));
        session.dispatch(SessionAction::SetTokens(AuthTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
        }));
        ApiClient::new(transport.clone(), session)
    }

    #[test]
    fn test_folder_input_omits_blank_fields() {
        let input = FolderInput::new("  Reports ", "   ", None);
        assert_eq!(body(&input).unwrap(), json!({ "name": "Reports" }));
    }

    #[test]
    fn test_user_input_from_form() {
        let form = UserForm {
            username: " jdoe ".into(),
            email: "jdoe@example.com".into(),
            full_name: String::new(),
            password: String::new(),
            role: Some(Role::Admin),
        };
        let input = UserInput::from_form(&form).unwrap();
        assert_eq!(
            body(&input).unwrap(),
            json!({ "username": "jdoe", "email": "jdoe@example.com", "role": "admin" })
        );
        let missing_role = UserForm {
            role: None,
            ..form
        };
        assert!(UserInput::from_form(&missing_role).is_none());
    }

    #[test]
    fn test_event_input_dates_serialize_as_rfc3339() {
        let input = EventInput {
            title: "Review".into(),
            description: None,
            location: Some("Room 4".into()),
            start_date: "2024-03-10T09:00:00Z".parse().unwrap(),
            end_date: "2024-03-10T10:00:00Z".parse().unwrap(),
            all_day: false,
        };
        let value = body(&input).unwrap();
        assert_eq!(value["start_date"], json!("2024-03-10T09:00:00Z"));
        assert!(value.get("description").is_none());
    }

    #[tokio::test]
    async fn test_folder_contents_classifies_items() {
        let transport = Rc::new(MockTransport::new());
        let mut folder = folder_json("f1", "Projects");
        folder["children"] = json!([folder_json("f2", "Drafts")]);
        folder["files"] = json!([{
            "id": "d1", "name": "Plan", "url": "https://example.com/plan.pdf",
            "file_type": "pdf", "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }]);
        transport.push(200, json!({ "data": folder }));

        let contents = client(&transport).folder_contents("f1").await.unwrap();
        assert_eq!(contents.folder.name, "Projects");
        assert!(matches!(contents.items[0], Item::Folder(_)));
        assert!(matches!(contents.items[1], Item::File(_)));
        assert_eq!(transport.requests()[0].path, "/folders/f1");
    }

    #[tokio::test]
    async fn test_move_endpoints() {
        let transport = Rc::new(MockTransport::new());
        transport.push(200, json!({ "message": "Folder moved" }));
        transport.push(200, json!({ "message": "File moved" }));
        let api = client(&transport);

        api.move_folder("f2", None).await.unwrap();
        api.move_file("d1", Some("f1")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/folders/f2/move");
        assert_eq!(requests[0].body, Some(json!({ "parent_id": null })));
        assert_eq!(requests[1].path, "/files/d1/move");
        assert_eq!(requests[1].body, Some(json!({ "folder_id": "f1" })));
    }

    #[tokio::test]
    async fn test_folder_cannot_move_into_itself() {
        let transport = Rc::new(MockTransport::new());
        let err = client(&transport).move_folder("f1", Some("f1")).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(transport.request_count(), 0);
    }
}
