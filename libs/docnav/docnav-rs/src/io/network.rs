use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::get_code_version;
use crate::model::api::*;
use crate::model::document::{Document, DocumentLink, DocumentPatch, LinkKind, Tag};
use crate::model::errors::{classify_rejection, NavErr, NavResult};
use crate::model::folder::Folder;
use crate::model::ids::{CompanyId, DocumentId, FolderId, TagId};
use crate::model::session::{Company, Session};
use crate::service::backend::Backend;

#[derive(Debug)]
pub enum ApiError {
    /// The server answered and said no. `message` is the `error` field of the body when there
    /// was one, otherwise the status' canonical reason.
    Endpoint { status: u16, message: String },
    InvalidAuth,
    Serialize(String),
    SendFailed(String),
    ReceiveFailed(String),
    Deserialize(String),
}

#[derive(Debug, Clone)]
pub struct Network {
    pub client: Client,
    pub get_code_version: fn() -> &'static str,
}

impl Default for Network {
    fn default() -> Self {
        Self { client: Default::default(), get_code_version }
    }
}

impl Network {
    #[instrument(level = "debug", skip(self, session, request), fields(route = %request.route()), err(Debug))]
    pub async fn request<T: Request>(
        &self, session: &Session, request: T,
    ) -> Result<T::Response, ApiError> {
        self.send(&session.api_url, Some(&session.token), request)
            .await
    }

    /// For the handful of routes that don't need a token, like signing in.
    pub async fn request_public<T: Request>(
        &self, api_url: &str, request: T,
    ) -> Result<T::Response, ApiError> {
        self.send(api_url, None, request).await
    }

    async fn send<T: Request>(
        &self, api_url: &str, token: Option<&str>, request: T,
    ) -> Result<T::Response, ApiError> {
        let url = format!("{}{}", api_url, request.route());
        let mut builder = self.client.request(T::METHOD, url.as_str());

        if request.has_body() {
            let body =
                serde_json::to_vec(&request).map_err(|err| ApiError::Serialize(err.to_string()))?;
            builder = builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        self.dispatch(builder, token).await
    }

    #[instrument(level = "debug", skip(self, session, form), fields(file = form.file.name.as_str()), err(Debug))]
    pub async fn upload(&self, session: &Session, form: UploadForm) -> Result<Document, ApiError> {
        let UploadForm { company_id, folder_id, sender_id, file } = form;

        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| ApiError::Serialize(err.to_string()))?;

        let mut multipart = Form::new()
            .part("file", part)
            .text("company_id", company_id.to_string())
            .text("name", file.name);
        if let Some(folder_id) = folder_id {
            multipart = multipart.text("folder_id", folder_id.to_string());
        }
        if let Some(sender_id) = sender_id {
            multipart = multipart.text("sender_id", sender_id.to_string());
        }

        let builder = self
            .client
            .post(format!("{}{}", session.api_url, UPLOAD_ROUTE))
            .multipart(multipart);

        self.dispatch(builder, Some(&session.token)).await
    }

    async fn dispatch<R: DeserializeOwned>(
        &self, builder: RequestBuilder, token: Option<&str>,
    ) -> Result<R, ApiError> {
        let mut builder = builder.header("Accept-Version", (self.get_code_version)());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let start = Instant::now();
        let sent = builder.send().await.map_err(|err| {
            warn!("send failed: {:#?}", err);
            ApiError::SendFailed(err.to_string())
        })?;
        if start.elapsed() > Duration::from_millis(1000) {
            warn!("network request took {:?}", start.elapsed());
        }

        let status = sent.status();
        let body = sent
            .bytes()
            .await
            .map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;

        decode(status, &body)
    }
}

/// Some endpoints report failures with a 2xx status and an `{"error": ...}` body, so the body
/// is checked for an error before it's treated as a response.
fn decode<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::InvalidAuth);
    }

    let rejection = serde_json::from_slice::<ErrorResponse>(body).ok();

    if !status.is_success() {
        let message = match rejection {
            Some(ErrorResponse { error }) => error,
            None => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        return Err(ApiError::Endpoint { status: status.as_u16(), message });
    }

    if let Some(ErrorResponse { error }) = rejection {
        return Err(ApiError::Endpoint { status: status.as_u16(), message: error });
    }

    // bodyless successes, usually deletes, read as an empty object
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"{}" } else { body };
    serde_json::from_slice(body).map_err(|err| ApiError::Deserialize(err.to_string()))
}

/// Upload rejections are told apart by size and type, everything else converts as usual.
fn upload_rejection(err: ApiError) -> NavErr {
    match err {
        ApiError::Endpoint { status, message } => classify_rejection(status, &message).into(),
        err => err.into(),
    }
}

#[async_trait]
impl Backend for Network {
    async fn login(&self, api_url: &str, email: &str, password: &str) -> NavResult<LoginResponse> {
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        Ok(self.request_public(api_url, request).await?)
    }

    async fn my_companies(&self, session: &Session) -> NavResult<Vec<Company>> {
        let response = self.request(session, MyCompaniesRequest {}).await?;
        Ok(response
            .companies
            .into_iter()
            .filter_map(|membership| membership.company)
            .collect())
    }

    async fn list_folders(&self, session: &Session, company_id: CompanyId) -> NavResult<Vec<Folder>> {
        Ok(self
            .request(session, GetCompanyFoldersRequest { company_id })
            .await?
            .folders)
    }

    async fn create_folder(
        &self, session: &Session, company_id: CompanyId, name: &str, parent: Option<FolderId>,
    ) -> NavResult<Folder> {
        let request = CreateFolderRequest { company_id, name: name.to_string(), parent_id: parent };
        Ok(self.request(session, request).await?)
    }

    async fn rename_folder(&self, session: &Session, id: FolderId, name: &str) -> NavResult<Folder> {
        Ok(self
            .request(session, RenameFolderRequest { id, name: name.to_string() })
            .await?)
    }

    async fn delete_folder(&self, session: &Session, id: FolderId) -> NavResult<()> {
        self.request(session, DeleteFolderRequest { id }).await?;
        Ok(())
    }

    async fn list_documents_by_company(
        &self, session: &Session, company_id: CompanyId,
    ) -> NavResult<Vec<Document>> {
        Ok(self
            .request(session, GetCompanyDocumentsRequest { company_id })
            .await?
            .documents)
    }

    async fn list_documents_by_folder(
        &self, session: &Session, folder_id: FolderId,
    ) -> NavResult<Vec<Document>> {
        Ok(self
            .request(session, GetFolderDocumentsRequest { folder_id })
            .await?
            .documents)
    }

    async fn get_document(&self, session: &Session, id: DocumentId) -> NavResult<Document> {
        Ok(self.request(session, GetDocumentRequest { id }).await?)
    }

    async fn upload_document(&self, session: &Session, form: UploadForm) -> NavResult<Document> {
        self.upload(session, form).await.map_err(upload_rejection)
    }

    async fn update_document(
        &self, session: &Session, id: DocumentId, patch: DocumentPatch,
    ) -> NavResult<Document> {
        Ok(self
            .request(session, UpdateDocumentRequest { id, patch })
            .await?)
    }

    async fn delete_document(&self, session: &Session, id: DocumentId) -> NavResult<()> {
        self.request(session, DeleteDocumentRequest { id }).await?;
        Ok(())
    }

    async fn search_documents(
        &self, session: &Session, company_id: CompanyId, query: SearchQuery,
    ) -> NavResult<Vec<Document>> {
        Ok(self
            .request(session, SearchDocumentsRequest { company_id, query })
            .await?
            .documents)
    }

    async fn document_link(
        &self, session: &Session, id: DocumentId, kind: LinkKind,
    ) -> NavResult<DocumentLink> {
        Ok(self
            .request(session, GetDocumentLinkRequest { id, kind })
            .await?)
    }

    async fn list_tags(&self, session: &Session, company_id: CompanyId) -> NavResult<Vec<Tag>> {
        Ok(self
            .request(session, GetCompanyTagsRequest { company_id })
            .await?
            .tags)
    }

    async fn add_tag(&self, session: &Session, document_id: DocumentId, tag_id: TagId) -> NavResult<()> {
        self.request(session, AddTagRequest { document_id, tag_id })
            .await?;
        Ok(())
    }

    async fn remove_tag(
        &self, session: &Session, document_id: DocumentId, tag_id: TagId,
    ) -> NavResult<()> {
        self.request(session, RemoveTagRequest { document_id, tag_id })
            .await?;
        Ok(())
    }
}
