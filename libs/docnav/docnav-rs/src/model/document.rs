use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{self, CompanyId, DocumentId, FolderId, SenderId, TagId, UserId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: TagId,
    pub company_id: CompanyId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sender {
    pub id: SenderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub company_id: CompanyId,
    /// `None` when the document lives at the company root, see [ids::optional_id].
    #[serde(default, with = "ids::optional_id")]
    pub folder_id: Option<FolderId>,
    pub name: String,
    pub file_path: String,
    #[serde(default)]
    pub preview_file_path: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    pub file_size: u64,
    pub mime_type: String,
    pub checksum: String,
    #[serde(default, with = "ids::optional_id")]
    pub sender_id: Option<SenderId>,
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `null` and missing both decode to no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
}

impl Document {
    pub fn is_root(&self) -> bool {
        is_root_document(self)
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag)
    }
}

/// Whether `doc` sits at the company root. The empty-string and `null` spellings were already
/// folded into `None` when the document was decoded.
pub fn is_root_document(doc: &Document) -> bool {
    doc.folder_id.is_none()
}

/// Partial update of a document's editable metadata. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<SenderId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Download,
    Preview,
}

/// A pre-signed, expiring url for a document's bytes or its rendered preview.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod unit_tests {
    use super::{is_root_document, Document};

    fn decode(folder_field: &str) -> Document {
        let json = format!(
            r#"{{
                "id": "6f1c8a52-7a39-4a7f-9a43-2b7d4d1b1e01",
                "company_id": "0d6c6f43-11a8-4d3e-8d36-6a3e1fd0a3c2",
                {folder_field}
                "name": "a.pdf",
                "file_path": "c/a.pdf",
                "file_size": 12,
                "mime_type": "application/pdf",
                "checksum": "abc",
                "created_at": "2025-01-02T03:04:05Z",
                "updated_at": "2025-01-02T03:04:05+03:00",
                "tags": null
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn root_membership_ignores_spelling() {
        assert!(is_root_document(&decode("")));
        assert!(is_root_document(&decode(r#""folder_id": null,"#)));
        assert!(is_root_document(&decode(r#""folder_id": "","#)));
        assert!(!is_root_document(
            &decode(r#""folder_id": "b5a0a7f2-3a3b-4f7e-9c1e-8e2b1f6a9d10","#)
        ));
    }

    #[test]
    fn null_tags_are_empty() {
        assert!(decode("").tags.is_empty());
    }
}
