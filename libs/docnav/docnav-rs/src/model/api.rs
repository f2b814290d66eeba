//! Wire contract with the document service: one struct per endpoint, each describing its method,
//! route and response shape. Path parameters are skipped when the request body is serialized.

use chrono::{DateTime, Utc};
use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::document::{null_as_empty, Document, DocumentLink, DocumentPatch, LinkKind, Tag};
use super::folder::Folder;
use super::ids::{CompanyId, DocumentId, FolderId, SenderId, TagId, UserId};
use super::session::Company;
use super::upload::UploadFile;

pub trait Request: Serialize + Send + Sync {
    type Response: Debug + DeserializeOwned;
    const METHOD: Method;

    fn route(&self) -> String;

    /// Whether the request is sent with a json body. Reads and deletes say everything in their
    /// route.
    fn has_body(&self) -> bool {
        Self::METHOD != Method::GET && Self::METHOD != Method::DELETE
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FolderList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TagList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Request for LoginRequest {
    type Response = LoginResponse;
    const METHOD: Method = Method::POST;

    fn route(&self) -> String {
        "/public/auth/login".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct MyCompaniesRequest {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompanyMembership {
    pub id: uuid::Uuid,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub role: u8,
    #[serde(default)]
    pub company: Option<Company>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MyCompaniesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companies: Vec<CompanyMembership>,
}

impl Request for MyCompaniesRequest {
    type Response = MyCompaniesResponse;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        "/private/companies/my".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetCompanyFoldersRequest {
    #[serde(skip)]
    pub company_id: CompanyId,
}

impl Request for GetCompanyFoldersRequest {
    type Response = FolderList;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        format!("/private/folders/company/{}", self.company_id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateFolderRequest {
    pub company_id: CompanyId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FolderId>,
}

impl Request for CreateFolderRequest {
    type Response = Folder;
    const METHOD: Method = Method::POST;

    fn route(&self) -> String {
        "/private/folders".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RenameFolderRequest {
    #[serde(skip)]
    pub id: FolderId,
    pub name: String,
}

impl Request for RenameFolderRequest {
    type Response = Folder;
    const METHOD: Method = Method::PUT;

    fn route(&self) -> String {
        format!("/private/folders/{}/rename", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DeleteFolderRequest {
    #[serde(skip)]
    pub id: FolderId,
}

impl Request for DeleteFolderRequest {
    type Response = MessageResponse;
    const METHOD: Method = Method::DELETE;

    fn route(&self) -> String {
        format!("/private/folders/{}", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetCompanyDocumentsRequest {
    #[serde(skip)]
    pub company_id: CompanyId,
}

impl Request for GetCompanyDocumentsRequest {
    type Response = DocumentList;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        format!("/private/documents/company/{}", self.company_id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetFolderDocumentsRequest {
    #[serde(skip)]
    pub folder_id: FolderId,
}

impl Request for GetFolderDocumentsRequest {
    type Response = DocumentList;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        format!("/private/documents/folder/{}", self.folder_id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetDocumentRequest {
    #[serde(skip)]
    pub id: DocumentId,
}

impl Request for GetDocumentRequest {
    type Response = Document;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        format!("/private/documents/{}", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct UpdateDocumentRequest {
    #[serde(skip)]
    pub id: DocumentId,
    #[serde(flatten)]
    pub patch: DocumentPatch,
}

impl Request for UpdateDocumentRequest {
    type Response = Document;
    const METHOD: Method = Method::PUT;

    fn route(&self) -> String {
        format!("/private/documents/{}", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DeleteDocumentRequest {
    #[serde(skip)]
    pub id: DocumentId,
}

impl Request for DeleteDocumentRequest {
    type Response = MessageResponse;
    const METHOD: Method = Method::DELETE;

    fn route(&self) -> String {
        format!("/private/documents/{}", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetDocumentLinkRequest {
    #[serde(skip)]
    pub id: DocumentId,
    #[serde(skip)]
    pub kind: LinkKind,
}

impl Request for GetDocumentLinkRequest {
    type Response = DocumentLink;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        match self.kind {
            LinkKind::Download => format!("/private/documents/{}/download", self.id),
            LinkKind::Preview => format!("/private/documents/{}/preview", self.id),
        }
    }
}

/// Filters for the search endpoint. Ranking is entirely up to the server.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tag_ids: Vec<TagId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<SenderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchQuery {
    pub fn text(query: &str) -> Self {
        Self { query: Some(query.to_string()), ..Default::default() }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SearchDocumentsRequest {
    pub company_id: CompanyId,
    #[serde(flatten)]
    pub query: SearchQuery,
}

impl Request for SearchDocumentsRequest {
    type Response = DocumentList;
    const METHOD: Method = Method::POST;

    fn route(&self) -> String {
        "/private/documents/search".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetCompanyTagsRequest {
    #[serde(skip)]
    pub company_id: CompanyId,
}

impl Request for GetCompanyTagsRequest {
    type Response = TagList;
    const METHOD: Method = Method::GET;

    fn route(&self) -> String {
        format!("/private/document-tags/company/{}", self.company_id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct AddTagRequest {
    pub document_id: DocumentId,
    pub tag_id: TagId,
}

impl Request for AddTagRequest {
    type Response = MessageResponse;
    const METHOD: Method = Method::POST;

    fn route(&self) -> String {
        "/private/document-tags/add".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RemoveTagRequest {
    pub document_id: DocumentId,
    pub tag_id: TagId,
}

impl Request for RemoveTagRequest {
    type Response = MessageResponse;
    const METHOD: Method = Method::POST;

    fn route(&self) -> String {
        "/private/document-tags/remove".to_string()
    }
}

/// Fields of the multipart upload form. `folder_id` and `sender_id` are only sent when present.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub company_id: CompanyId,
    pub folder_id: Option<FolderId>,
    pub sender_id: Option<SenderId>,
    pub file: UploadFile,
}

pub const UPLOAD_ROUTE: &str = "/private/documents";
