//! Server-managed resources.
//!
//! The entity payloads mirror the REST API. [`Item`] is the one place where a
//! folder and a file are told apart; the decision is made when a payload is
//! ingested, never at render time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// A family of cached queries that share invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFamily {
    Folders,
    Files,
    Users,
    Activities,
    Events,
}

impl ResourceFamily {
    pub const ALL: [ResourceFamily; 5] = [
        Self::Folders,
        Self::Files,
        Self::Users,
        Self::Activities,
        Self::Events,
    ];

    /// Collection path relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Folders => "/folders",
            Self::Files => "/files",
            Self::Users => "/users",
            Self::Activities => "/activities",
            Self::Events => "/events",
        }
    }

    /// Families whose cached queries a successful mutation of `self` makes
    /// stale. Always includes `self`.
    ///
    /// Folder mutations change the file listings scoped to them, file
    /// mutations change folder file counts, and every mutation is recorded
    /// in the activity log.
    pub fn affected_by(&self) -> &'static [ResourceFamily] {
        match self {
            Self::Folders => &[Self::Folders, Self::Files, Self::Activities],
            Self::Files => &[Self::Files, Self::Folders, Self::Activities],
            Self::Users => &[Self::Users, Self::Activities],
            Self::Events => &[Self::Events, Self::Activities],
            Self::Activities => &[Self::Activities],
        }
    }
}

/// Folder as listed by `/folders`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub folder_count: u64,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A file entry. Files are stored as links to external content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileLink {
    pub id: String,
    pub name: String,
    pub url: String,
    pub file_type: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account as managed by administrators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// One audit-log record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub action: String,
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Calendar event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event overlaps the half-open range `[from, to)`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start_date < to && self.end_date >= from
    }
}

/// Entry of a folder listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Folder(Folder),
    File(FileLink),
}

impl Item {
    /// Classify a raw payload. Anything carrying a `file_type` is a file.
    pub fn ingest(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("file_type").is_some() {
            serde_json::from_value(value).map(Self::File)
        } else {
            serde_json::from_value(value).map(Self::Folder)
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::File(file) => &file.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn family(&self) -> ResourceFamily {
        match self {
            Self::Folder(_) => ResourceFamily::Folders,
            Self::File(_) => ResourceFamily::Files,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Self::Folder(folder) => folder.updated_at,
            Self::File(file) => file.updated_at,
        }
    }
}

/// Folder detail with its direct children.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderContents {
    pub folder: Folder,
    /// Child folders first, then files, each in server order.
    pub items: Vec<Item>,
}

impl FolderContents {
    /// Build from the `/folders/:id` payload, which nests `children` and
    /// `files` arrays inside the folder object.
    pub fn ingest(mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut take = |key: &str| -> Vec<serde_json::Value> {
            match value.get_mut(key).map(serde_json::Value::take) {
                Some(serde_json::Value::Array(entries)) => entries,
                _ => Vec::new(),
            }
        };
        let children = take("children");
        let files = take("files");

        let folder: Folder = serde_json::from_value(value)?;
        let mut items = Vec::with_capacity(children.len() + files.len());
        for child in children {
            items.push(Item::Folder(serde_json::from_value(child)?));
        }
        for file in files {
            items.push(Item::ingest(file)?);
        }
        Ok(Self { folder, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn folder_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Reports",
            "parent_id": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
        })
    }

    fn file_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Q3.pdf",
            "url": "https://example.com/q3.pdf",
            "file_type": "pdf",
            "folder_id": "f-1",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-03T00:00:00Z",
        })
    }

    #[test]
    fn test_affected_families_include_self() {
        for family in ResourceFamily::ALL {
            assert!(family.affected_by().contains(&family));
        }
    }

    #[test]
    fn test_file_mutation_touches_folders() {
        assert!(ResourceFamily::Files
            .affected_by()
            .contains(&ResourceFamily::Folders));
        assert!(!ResourceFamily::Users
            .affected_by()
            .contains(&ResourceFamily::Folders));
    }

    #[test]
    fn test_ingest_classifies_by_file_type() {
        let item = Item::ingest(file_json("x-1")).unwrap();
        assert!(!item.is_folder());
        assert_eq!(item.family(), ResourceFamily::Files);

        let item = Item::ingest(folder_json("f-1")).unwrap();
        assert!(item.is_folder());
        assert_eq!(item.name(), "Reports");
    }

    #[test]
    fn test_item_serializes_with_kind_tag() {
        let item = Item::ingest(file_json("x-1")).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["kind"], "file");
        assert_eq!(value["id"], "x-1");

        let back: Item = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_folder_contents_orders_folders_first() {
        let mut payload = folder_json("root");
        payload["children"] = json!([folder_json("c-1")]);
        payload["files"] = json!([file_json("x-1"), file_json("x-2")]);

        let contents = FolderContents::ingest(payload).unwrap();
        assert_eq!(contents.folder.id, "root");
        let ids: Vec<_> = contents.items.iter().map(Item::id).collect();
        assert_eq!(ids, vec!["c-1", "x-1", "x-2"]);
        assert!(contents.items[0].is_folder());
    }

    #[test]
    fn test_folder_contents_without_children() {
        let contents = FolderContents::ingest(folder_json("root")).unwrap();
        assert!(contents.items.is_empty());
    }

    #[test]
    fn test_event_overlap() {
        let at = |s: &str| s.parse::<DateTime<Utc>>().unwrap();
        let event = Event {
            id: "e-1".into(),
            title: "Review".into(),
            description: None,
            location: None,
            start_date: at("2024-03-10T09:00:00Z"),
            end_date: at("2024-03-10T10:00:00Z"),
            all_day: false,
            created_at: at("2024-03-01T00:00:00Z"),
            updated_at: at("2024-03-01T00:00:00Z"),
        };
        assert!(event.overlaps(at("2024-03-01T00:00:00Z"), at("2024-04-01T00:00:00Z")));
        assert!(!event.overlaps(at("2024-04-01T00:00:00Z"), at("2024-05-01T00:00:00Z")));
        assert!(!event.overlaps(at("2024-02-01T00:00:00Z"), at("2024-03-10T09:00:00Z")));
    }
}
