use crate::model::document::{is_root_document, Document};
use crate::model::errors::NavResult;
use crate::model::ids::{CompanyId, FolderId};
use crate::model::session::Session;
use crate::Navigator;

impl Navigator {
    /// Documents of `folder`, `None` for the root.
    ///
    /// There is no endpoint for root documents: the root is loaded as every company document
    /// whose folder id is absent or empty. If `folder` is the selected folder the result becomes
    /// the displayed list, a failure leaves that list empty.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn load_documents(&self, folder: Option<FolderId>) -> NavResult<Vec<Document>> {
        let (session, company) = self.company_session().await?;
        let ticket = {
            let mut state = self.state.write().await;
            (state.selected_folder == folder).then(|| state.begin_documents_load())
        };

        self.fetch_documents(&session, company, folder, ticket)
            .await
    }

    /// Reloads whatever folder is selected.
    pub async fn reload_documents(&self) -> NavResult<Vec<Document>> {
        let folder = self.state.read().await.selected_folder;
        self.load_documents(folder).await
    }

    /// Reloads `target` if it's still the selected folder, otherwise there is nothing on screen
    /// to refresh.
    pub(crate) async fn refresh_documents(&self, target: Option<FolderId>) -> NavResult<()> {
        if self.state.read().await.selected_folder != target {
            debug!(?target, "target no longer selected, skipping refresh");
            return Ok(());
        }
        self.load_documents(target).await?;
        Ok(())
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    /// Fetches and, when `ticket` is still the newest load for the still-selected `folder`,
    /// commits. Anything else is a response to a selection the user already moved away from.
    pub(crate) async fn fetch_documents(
        &self, session: &Session, company: CompanyId, folder: Option<FolderId>, ticket: Option<u64>,
    ) -> NavResult<Vec<Document>> {
        let result = match folder {
            None => self
                .backend
                .list_documents_by_company(session, company)
                .await
                .map(|docs| docs.into_iter().filter(is_root_document).collect()),
            Some(id) => self.backend.list_documents_by_folder(session, id).await,
        };

        let Some(ticket) = ticket else {
            return result;
        };

        let mut state = self.state.write().await;
        if !state.is_current_documents_load(ticket, folder) {
            debug!(?folder, "discarding superseded document load");
            return result;
        }

        state.documents_loading = false;
        match &result {
            Ok(docs) => state.documents = docs.clone(),
            Err(err) => {
                error!(?folder, ?err, "could not load documents");
                state.documents.clear();
            }
        }
        drop(state);

        self.events.documents_loaded(folder);
        result
    }
}
