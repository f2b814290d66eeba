use crate::model::errors::{NavErrKind, NavResult, Unexpected};
use crate::model::folder::Folder;
use crate::model::ids::FolderId;
use crate::model::tree::FolderTree;
use crate::Navigator;

impl Navigator {
    /// Replaces the folder index with the company's current folders. An empty company is a
    /// successful, empty load. On failure the index is emptied and the error returned, nothing
    /// stale is kept around.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn load_folders(&self) -> NavResult<Vec<Folder>> {
        let (session, company) = self.company_session().await?;
        let ticket = self.state.write().await.begin_folders_load();

        let result = self.backend.list_folders(&session, company).await;

        let mut state = self.state.write().await;
        if !state.is_current_folders_load(ticket) {
            debug!("discarding superseded folder load");
            return result;
        }
        state.folders_loading = false;
        match result {
            Ok(folders) => {
                state.folders = folders.clone();
                drop(state);
                self.events.folders_loaded();
                Ok(folders)
            }
            Err(err) => {
                error!(?err, "could not load folders");
                state.folders.clear();
                drop(state);
                self.events.folders_loaded();
                Err(err)
            }
        }
    }

    pub async fn folders(&self) -> Vec<Folder> {
        self.state.read().await.folders.clone()
    }

    pub async fn get_folder(&self, id: FolderId) -> NavResult<Folder> {
        self.state.read().await.folders.find(&id).cloned()
    }

    /// Folders directly below `parent`, `None` for the top level. Computed from the index on
    /// every call.
    pub async fn children_of(&self, parent: Option<FolderId>) -> Vec<Folder> {
        self.state
            .read()
            .await
            .folders
            .children_of(parent)
            .into_iter()
            .cloned()
            .collect()
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn create_folder(&self, name: &str, parent: Option<FolderId>) -> NavResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NavErrKind::FolderNameEmpty.into());
        }
        let (session, company) = self.company_session().await?;

        let folder = self
            .backend
            .create_folder(&session, company, name, parent)
            .await
            .map_err(|err| {
                error!(?err, "could not create folder");
                err
            })?;

        self.load_folders().await.log_and_ignore();
        Ok(folder)
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn rename_folder(&self, id: FolderId, name: &str) -> NavResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NavErrKind::FolderNameEmpty.into());
        }
        let (session, _) = self.company_session().await?;

        let folder = self
            .backend
            .rename_folder(&session, id, name)
            .await
            .map_err(|err| {
                error!(?err, "could not rename folder");
                err
            })?;

        self.load_folders().await.log_and_ignore();
        Ok(folder)
    }

    /// Deletes a folder. If the selection was inside it the navigator falls back to the root.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_folder(&self, id: FolderId) -> NavResult<()> {
        let (session, _) = self.company_session().await?;

        self.backend
            .delete_folder(&session, id)
            .await
            .map_err(|err| {
                error!(?err, "could not delete folder");
                err
            })?;

        let selection_lost = {
            let mut state = self.state.write().await;
            let lost = match state.selected_folder {
                Some(selected) => state.folders.is_same_or_descendant(&selected, &id),
                None => false,
            };
            state.expanded.remove(&id);
            lost
        };

        self.load_folders().await.log_and_ignore();
        if selection_lost {
            self.select_folder(None).await.log_and_ignore();
        }
        Ok(())
    }
}
