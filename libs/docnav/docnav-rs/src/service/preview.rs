use crate::model::document::{Document, DocumentLink, DocumentPatch, LinkKind, Tag};
use crate::model::errors::{NavErrKind, NavResult};
use crate::model::ids::{DocumentId, TagId};
use crate::model::session::Session;
use crate::Navigator;

impl Navigator {
    /// Shows `doc` right away, then swaps in the full record once the server returns it. If that
    /// fetch fails the summary stays up and the failure is only logged. A response for a
    /// document that is no longer selected is dropped.
    #[instrument(level = "debug", skip_all, fields(id = %doc.id))]
    pub async fn select_document(&self, doc: Document) {
        let id = doc.id;
        let ticket = {
            let mut state = self.state.write().await;
            state.selected_document = Some(doc);
            state.begin_detail_load()
        };
        self.events.document_selected(id);

        let session = match self.session().await {
            Ok(session) => session,
            Err(err) => {
                warn!(?err, "can't fetch document detail");
                return;
            }
        };

        match self.backend.get_document(&session, id).await {
            Ok(full) => {
                let mut state = self.state.write().await;
                if state.is_current_detail_load(ticket, id) {
                    state.selected_document = Some(full);
                } else {
                    debug!("discarding detail for a document no longer selected");
                }
            }
            Err(err) => error!(?err, "could not fetch document detail, keeping summary"),
        }
    }

    pub async fn selected_document(&self) -> Option<Document> {
        self.state.read().await.selected_document.clone()
    }

    pub async fn clear_document_selection(&self) {
        let mut state = self.state.write().await;
        state.selected_document = None;
        state.begin_detail_load();
    }

    /// Refetches the selected document and patches it into the selection, the folder list and
    /// the search results. Other entries of those lists are left as they are.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn on_update(&self) -> NavResult<Document> {
        let (session, id) = self.selected_document_session().await?;
        self.refresh_document(&session, id).await
    }

    /// Forgets the selected document everywhere it's held. The document is not refetched.
    pub async fn on_delete(&self) {
        let selected = self.state.read().await.selected_document_id();
        if let Some(id) = selected {
            self.forget_document(id).await;
        }
    }

    /// Deletes the selected document. Unlike reads, a failure here is returned so the user can be
    /// told the document is still there.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_selected_document(&self) -> NavResult<()> {
        let (session, id) = self.selected_document_session().await?;
        self.backend
            .delete_document(&session, id)
            .await
            .map_err(|err| {
                error!(?err, %id, "could not delete document");
                err
            })?;

        // the selection may have moved on while the delete was in flight
        self.forget_document(id).await;
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn add_tag(&self, tag: TagId) -> NavResult<Document> {
        let (session, id) = self.selected_document_session().await?;
        self.backend
            .add_tag(&session, id, tag)
            .await
            .map_err(|err| {
                error!(?err, "could not add tag");
                err
            })?;
        self.refresh_document(&session, id).await
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn remove_tag(&self, tag: TagId) -> NavResult<Document> {
        let (session, id) = self.selected_document_session().await?;
        self.backend
            .remove_tag(&session, id, tag)
            .await
            .map_err(|err| {
                error!(?err, "could not remove tag");
                err
            })?;
        self.refresh_document(&session, id).await
    }

    /// Tags of the company, for the tag editor's picker.
    pub async fn available_tags(&self) -> NavResult<Vec<Tag>> {
        let (session, company) = self.company_session().await?;
        self.backend.list_tags(&session, company).await
    }

    /// Renames, moves or reassigns the selected document. A document moved out of the selected
    /// folder leaves the displayed list.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn update_document(&self, patch: DocumentPatch) -> NavResult<Document> {
        let (session, id) = self.selected_document_session().await?;
        let doc = self
            .backend
            .update_document(&session, id, patch)
            .await
            .map_err(|err| {
                error!(?err, "could not update document");
                err
            })?;
        self.apply_document_update(&doc).await;
        Ok(doc)
    }

    /// A pre-signed url to download or preview the selected document.
    pub async fn document_link(&self, kind: LinkKind) -> NavResult<DocumentLink> {
        let (session, id) = self.selected_document_session().await?;
        self.backend.document_link(&session, id, kind).await
    }

    /// Refetches `id` and patches it in wherever it's held, whether or not it's still selected.
    async fn refresh_document(&self, session: &Session, id: DocumentId) -> NavResult<Document> {
        let doc = self.backend.get_document(session, id).await?;
        self.apply_document_update(&doc).await;
        Ok(doc)
    }

    /// Drops `id` from every held list. The selection is cleared only if it is `id`.
    async fn forget_document(&self, id: DocumentId) {
        {
            let mut state = self.state.write().await;
            if state.selected_document_id() == Some(id) {
                state.begin_detail_load();
            }
            state.apply_removal(id);
        }
        self.events.document_deleted(id);
    }

    async fn apply_document_update(&self, doc: &Document) {
        self.state.write().await.apply_update(doc);
        self.events.document_updated(doc.id);
    }

    async fn selected_document_session(&self) -> NavResult<(Session, DocumentId)> {
        let session = self.session().await?;
        let id = self
            .state
            .read()
            .await
            .selected_document_id()
            .ok_or(NavErrKind::NothingSelected)?;
        Ok((session, id))
    }
}
