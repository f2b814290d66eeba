use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::model::api::UploadForm;
use crate::model::errors::{NavErr, NavErrKind, NavResult, Unexpected};
use crate::model::ids::{FolderId, SenderId};
use crate::model::tree::FolderTree;
use crate::model::upload::{UploadFailure, UploadFile, UploadSummary};
use crate::service::state::DragTarget;
use crate::Navigator;

impl Navigator {
    /// Uploads `files` one after another into `target` (`None` is root). A failing file doesn't
    /// stop the batch, its reason is recorded in the summary. Once the batch is done, and only
    /// if something was uploaded, the target's document list is reloaded a single time.
    pub async fn upload(
        &self, files: Vec<UploadFile>, target: Option<FolderId>,
    ) -> NavResult<UploadSummary> {
        self.upload_with_sender(files, target, None).await
    }

    #[instrument(level = "debug", skip(self, files), fields(files = files.len()), err(Debug))]
    pub async fn upload_with_sender(
        &self, files: Vec<UploadFile>, target: Option<FolderId>, sender: Option<SenderId>,
    ) -> NavResult<UploadSummary> {
        let (session, company) = self.company_session().await?;

        let mut summary = UploadSummary::new(target, files.len());
        if files.is_empty() {
            return Ok(summary);
        }

        let in_flight = InFlight::begin(&self.uploads);

        for file in files {
            let file_name = file.name.clone();
            let outcome = if file.size() > self.config.max_upload_bytes {
                Err(NavErr::from(NavErrKind::FileTooLarge))
            } else {
                let form = UploadForm { company_id: company, folder_id: target, sender_id: sender, file };
                self.backend.upload_document(&session, form).await
            };

            match outcome {
                Ok(doc) => {
                    debug!(name = %file_name, id = %doc.id, "uploaded");
                    summary.uploaded.push(doc);
                }
                Err(err) => {
                    warn!(name = %file_name, ?err, "upload failed");
                    summary
                        .failures
                        .push(UploadFailure { kind: (&err).into(), file_name });
                }
            }
        }

        drop(in_flight);

        if summary.success_count() > 0 {
            self.refresh_documents(target).await.log_and_ignore();
        }

        info!(
            succeeded = summary.success_count(),
            failed = summary.failure_count(),
            "upload batch complete"
        );
        self.events
            .upload_batch_completed(target, summary.success_count(), summary.failure_count());

        Ok(summary)
    }

    /// Uploads into whatever folder is selected.
    pub async fn upload_to_selected(&self, files: Vec<UploadFile>) -> NavResult<UploadSummary> {
        let target = self.state.read().await.selected_folder;
        self.upload(files, target).await
    }

    /// The pointer entered the drop zone. Only a drag carrying files shows the overlay.
    pub async fn drag_enter(&self, carries_files: bool) {
        if carries_files {
            self.state.write().await.drop_zone.active = true;
        }
    }

    /// Leaves reported by children of the zone are ignored.
    pub async fn drag_leave(&self, from: DragTarget) {
        if from == DragTarget::Zone {
            self.state.write().await.drop_zone.active = false;
        }
    }

    /// Files were dropped. The overlay goes away and the files are uploaded into the selected
    /// folder, whether or not the overlay was showing.
    pub async fn drop_files(&self, files: Vec<UploadFile>) -> NavResult<UploadSummary> {
        self.state.write().await.drop_zone.active = false;
        self.upload_to_selected(files).await
    }

    /// Text of the drop overlay, `None` while it's hidden.
    pub async fn drop_overlay(&self) -> Option<String> {
        if !self.state.read().await.drop_zone.active {
            return None;
        }
        Some(format!("Drop files to upload to {}", self.drop_target_name().await))
    }

    /// Name of the folder dropped files would land in. The root, or a selected folder the index
    /// doesn't know about, reads as "root".
    pub async fn drop_target_name(&self) -> String {
        let state = self.state.read().await;
        state
            .selected_folder
            .and_then(|id| state.folders.maybe_find(&id))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "root".to_string())
    }
}

/// Counts a batch as running until dropped, including when the batch's future is cancelled.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn begin(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
