use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use docnav::model::api::{LoginResponse, SearchQuery, UploadForm};
use docnav::model::document::{Document, DocumentLink, DocumentPatch, LinkKind, Tag};
use docnav::model::folder::Folder;
use docnav::model::ids::{CompanyId, DocumentId, FolderId, TagId};
use docnav::model::session::{Company, Session};
use docnav::model::tree::FolderTree;
use docnav::service::backend::Backend;
use docnav::{NavErrKind, NavResult};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{document, folder};

/// Where a gated call parks until the test releases it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Document listing for a folder, `None` for the company-wide listing the root uses.
    Listing(Option<FolderId>),
    Detail(DocumentId),
    /// Deletes, tag changes and metadata updates of a document.
    Mutation(DocumentId),
    /// Upload of the file with this name.
    Upload(String),
}

#[derive(Default)]
struct Store {
    folders: Vec<Folder>,
    documents: Vec<Document>,
    tags: Vec<Tag>,
    calls: HashMap<&'static str, usize>,
    failing: HashMap<&'static str, NavErrKind>,
    rejected_uploads: HashMap<String, NavErrKind>,
    gates: HashMap<Gate, Arc<Notify>>,
}

/// An in-memory stand-in for the document service. Counts calls per method, can be told to fail
/// a method or reject a specific upload, and can hold listing, detail and mutation calls until
/// released so tests decide the order responses arrive in.
pub struct MockBackend {
    pub company: Company,
    store: Mutex<Store>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            company: Company { id: Uuid::new_v4(), name: "Acme".to_string() },
            store: Default::default(),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn add_folder(&self, name: &str, parent: Option<FolderId>) -> Folder {
        let folder = folder(self.company.id, name, parent);
        self.store().folders.push(folder.clone());
        folder
    }

    pub fn add_document(&self, name: &str, folder_id: Option<FolderId>) -> Document {
        self.insert_document(document(self.company.id, name, folder_id))
    }

    pub fn insert_document(&self, doc: Document) -> Document {
        self.store().documents.push(doc.clone());
        doc
    }

    pub fn create_tag(&self, name: &str) -> Tag {
        let tag = Tag { id: Uuid::new_v4(), company_id: self.company.id, name: name.to_string() };
        self.store().tags.push(tag.clone());
        tag
    }

    /// Changes a document behind the navigator's back, like another user would.
    pub fn edit_document(&self, id: DocumentId, edit: impl FnOnce(&mut Document)) {
        if let Some(doc) = self.store().documents.iter_mut().find(|d| d.id == id) {
            edit(doc);
        }
    }

    pub fn stored_documents(&self) -> Vec<Document> {
        self.store().documents.clone()
    }

    /// How many times `method` was called.
    pub fn calls(&self, method: &str) -> usize {
        self.store().calls.get(method).copied().unwrap_or(0)
    }

    pub fn reset_calls(&self) {
        self.store().calls.clear();
    }

    /// Every later call to `method` fails with `kind` until [MockBackend::heal].
    pub fn fail(&self, method: &'static str, kind: NavErrKind) {
        self.store().failing.insert(method, kind);
    }

    pub fn heal(&self, method: &'static str) {
        self.store().failing.remove(method);
    }

    /// Uploads of a file called `name` are rejected with `kind`.
    pub fn reject_upload(&self, name: &str, kind: NavErrKind) {
        self.store()
            .rejected_uploads
            .insert(name.to_string(), kind);
    }

    /// Calls reaching `gate` wait until [MockBackend::release] is called for it.
    pub fn hold(&self, gate: Gate) {
        self.store().gates.insert(gate, Arc::new(Notify::new()));
    }

    pub fn release(&self, gate: Gate) {
        if let Some(notify) = self.store().gates.remove(&gate) {
            notify.notify_one();
        }
    }

    fn record(&self, method: &'static str) -> NavResult<()> {
        let mut store = self.store();
        *store.calls.entry(method).or_default() += 1;
        match store.failing.get(method) {
            Some(kind) => Err(kind.clone().into()),
            None => Ok(()),
        }
    }

    async fn pass(&self, gate: Gate) {
        let notify = self.store().gates.get(&gate).cloned();
        if let Some(notify) = notify {
            notify.notified().await;
        }
    }

    fn missing_document() -> docnav::NavErr {
        NavErrKind::Server { status: 404, message: "document not found".to_string() }.into()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, _api_url: &str, email: &str, password: &str) -> NavResult<LoginResponse> {
        self.record("login")?;
        if email.is_empty() || password.is_empty() {
            return Err(NavErrKind::InvalidAuth.into());
        }
        Ok(LoginResponse {
            token: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + Duration::hours(24),
        })
    }

    async fn my_companies(&self, _session: &Session) -> NavResult<Vec<Company>> {
        self.record("my_companies")?;
        Ok(vec![self.company.clone()])
    }

    async fn list_folders(&self, _session: &Session, company_id: CompanyId) -> NavResult<Vec<Folder>> {
        self.record("list_folders")?;
        Ok(self
            .store()
            .folders
            .iter()
            .filter(|f| f.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn create_folder(
        &self, _session: &Session, company_id: CompanyId, name: &str, parent: Option<FolderId>,
    ) -> NavResult<Folder> {
        self.record("create_folder")?;
        let mut store = self.store();
        if let Some(parent) = parent {
            store.folders.find(&parent)?;
        }
        let created = folder(company_id, name, parent);
        store.folders.push(created.clone());
        Ok(created)
    }

    async fn rename_folder(&self, _session: &Session, id: FolderId, name: &str) -> NavResult<Folder> {
        self.record("rename_folder")?;
        let mut store = self.store();
        let folder = store
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(NavErrKind::FolderNonexistent)?;
        folder.name = name.to_string();
        Ok(folder.clone())
    }

    async fn delete_folder(&self, _session: &Session, id: FolderId) -> NavResult<()> {
        self.record("delete_folder")?;
        let mut store = self.store();
        store.folders.find(&id)?;
        let doomed: Vec<FolderId> = store
            .folders
            .iter()
            .map(|f| f.id)
            .filter(|f| store.folders.is_same_or_descendant(f, &id))
            .collect();
        store.folders.retain(|f| !doomed.contains(&f.id));
        store
            .documents
            .retain(|d| !d.folder_id.map(|f| doomed.contains(&f)).unwrap_or(false));
        Ok(())
    }

    async fn list_documents_by_company(
        &self, _session: &Session, company_id: CompanyId,
    ) -> NavResult<Vec<Document>> {
        self.record("list_documents_by_company")?;
        self.pass(Gate::Listing(None)).await;
        Ok(self
            .store()
            .documents
            .iter()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_documents_by_folder(
        &self, _session: &Session, folder_id: FolderId,
    ) -> NavResult<Vec<Document>> {
        self.record("list_documents_by_folder")?;
        self.pass(Gate::Listing(Some(folder_id))).await;
        Ok(self
            .store()
            .documents
            .iter()
            .filter(|d| d.folder_id == Some(folder_id))
            .cloned()
            .collect())
    }

    async fn get_document(&self, _session: &Session, id: DocumentId) -> NavResult<Document> {
        self.record("get_document")?;
        self.pass(Gate::Detail(id)).await;
        self.store()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(Self::missing_document)
    }

    async fn upload_document(&self, _session: &Session, form: UploadForm) -> NavResult<Document> {
        self.record("upload_document")?;
        self.pass(Gate::Upload(form.file.name.clone())).await;
        let mut store = self.store();
        if let Some(kind) = store.rejected_uploads.get(&form.file.name) {
            return Err(kind.clone().into());
        }
        if let Some(folder_id) = form.folder_id {
            store.folders.find(&folder_id)?;
        }

        let mut doc = document(form.company_id, &form.file.name, form.folder_id);
        doc.file_size = form.file.size();
        doc.mime_type = form.file.mime_type.clone();
        doc.sender_id = form.sender_id;
        store.documents.push(doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self, _session: &Session, id: DocumentId, patch: DocumentPatch,
    ) -> NavResult<Document> {
        self.record("update_document")?;
        self.pass(Gate::Mutation(id)).await;
        let mut store = self.store();
        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(Self::missing_document)?;
        if let Some(name) = patch.name {
            doc.name = name;
        }
        if let Some(folder_id) = patch.folder_id {
            doc.folder_id = Some(folder_id);
        }
        if let Some(sender_id) = patch.sender_id {
            doc.sender_id = Some(sender_id);
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete_document(&self, _session: &Session, id: DocumentId) -> NavResult<()> {
        self.record("delete_document")?;
        self.pass(Gate::Mutation(id)).await;
        let mut store = self.store();
        let before = store.documents.len();
        store.documents.retain(|d| d.id != id);
        if store.documents.len() == before {
            return Err(Self::missing_document());
        }
        Ok(())
    }

    async fn search_documents(
        &self, _session: &Session, company_id: CompanyId, query: SearchQuery,
    ) -> NavResult<Vec<Document>> {
        self.record("search_documents")?;
        let text = query.query.as_deref().map(str::to_lowercase);
        Ok(self
            .store()
            .documents
            .iter()
            .filter(|d| d.company_id == company_id)
            .filter(|d| match &text {
                Some(text) => d.name.to_lowercase().contains(text),
                None => true,
            })
            .filter(|d| query.folder_id.is_none() || d.folder_id == query.folder_id)
            .filter(|d| query.sender_id.is_none() || d.sender_id == query.sender_id)
            .filter(|d| query.tag_ids.iter().all(|t| d.has_tag(*t)))
            .cloned()
            .collect())
    }

    async fn document_link(
        &self, _session: &Session, id: DocumentId, kind: LinkKind,
    ) -> NavResult<DocumentLink> {
        self.record("document_link")?;
        let kind = match kind {
            LinkKind::Download => "download",
            LinkKind::Preview => "preview",
        };
        Ok(DocumentLink {
            url: format!("https://files.test/{id}/{kind}"),
            expires_at: Utc::now() + Duration::minutes(15),
        })
    }

    async fn list_tags(&self, _session: &Session, company_id: CompanyId) -> NavResult<Vec<Tag>> {
        self.record("list_tags")?;
        Ok(self
            .store()
            .tags
            .iter()
            .filter(|t| t.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn add_tag(&self, _session: &Session, document_id: DocumentId, tag_id: TagId) -> NavResult<()> {
        self.record("add_tag")?;
        self.pass(Gate::Mutation(document_id)).await;
        let mut store = self.store();
        let tag = store
            .tags
            .iter()
            .find(|t| t.id == tag_id)
            .cloned()
            .ok_or_else(|| NavErrKind::Server { status: 404, message: "tag not found".to_string() })?;
        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(Self::missing_document)?;
        if !doc.has_tag(tag_id) {
            doc.tags.push(tag);
        }
        Ok(())
    }

    async fn remove_tag(
        &self, _session: &Session, document_id: DocumentId, tag_id: TagId,
    ) -> NavResult<()> {
        self.record("remove_tag")?;
        self.pass(Gate::Mutation(document_id)).await;
        let mut store = self.store();
        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(Self::missing_document)?;
        doc.tags.retain(|t| t.id != tag_id);
        Ok(())
    }
}
