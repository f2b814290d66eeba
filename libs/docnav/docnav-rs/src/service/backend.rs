use async_trait::async_trait;

use crate::model::api::{LoginResponse, SearchQuery, UploadForm};
use crate::model::document::{Document, DocumentLink, DocumentPatch, LinkKind, Tag};
use crate::model::errors::NavResult;
use crate::model::folder::Folder;
use crate::model::ids::{CompanyId, DocumentId, FolderId, TagId};
use crate::model::session::{Company, Session};

/// The folder, document, tag and auth services the navigator talks to. [crate::io::network::Network]
/// is the real thing; tests substitute an in-memory implementation.
///
/// Implementations classify rejected uploads into [crate::NavErrKind::FileTooLarge] and
/// [crate::NavErrKind::UnsupportedFileType] where they can tell.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, api_url: &str, email: &str, password: &str) -> NavResult<LoginResponse>;
    async fn my_companies(&self, session: &Session) -> NavResult<Vec<Company>>;

    async fn list_folders(&self, session: &Session, company_id: CompanyId) -> NavResult<Vec<Folder>>;
    async fn create_folder(
        &self, session: &Session, company_id: CompanyId, name: &str, parent: Option<FolderId>,
    ) -> NavResult<Folder>;
    async fn rename_folder(&self, session: &Session, id: FolderId, name: &str) -> NavResult<Folder>;
    async fn delete_folder(&self, session: &Session, id: FolderId) -> NavResult<()>;

    async fn list_documents_by_company(
        &self, session: &Session, company_id: CompanyId,
    ) -> NavResult<Vec<Document>>;
    async fn list_documents_by_folder(
        &self, session: &Session, folder_id: FolderId,
    ) -> NavResult<Vec<Document>>;
    async fn get_document(&self, session: &Session, id: DocumentId) -> NavResult<Document>;
    async fn upload_document(&self, session: &Session, form: UploadForm) -> NavResult<Document>;
    async fn update_document(
        &self, session: &Session, id: DocumentId, patch: DocumentPatch,
    ) -> NavResult<Document>;
    async fn delete_document(&self, session: &Session, id: DocumentId) -> NavResult<()>;
    async fn search_documents(
        &self, session: &Session, company_id: CompanyId, query: SearchQuery,
    ) -> NavResult<Vec<Document>>;
    async fn document_link(
        &self, session: &Session, id: DocumentId, kind: LinkKind,
    ) -> NavResult<DocumentLink>;

    async fn list_tags(&self, session: &Session, company_id: CompanyId) -> NavResult<Vec<Tag>>;
    async fn add_tag(&self, session: &Session, document_id: DocumentId, tag_id: TagId) -> NavResult<()>;
    async fn remove_tag(
        &self, session: &Session, document_id: DocumentId, tag_id: TagId,
    ) -> NavResult<()>;
}
