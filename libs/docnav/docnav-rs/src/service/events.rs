pub use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::*;

use crate::model::ids::{DocumentId, FolderId};
use crate::Navigator;

#[derive(Clone)]
pub struct EventSubs {
    tx: Sender<Event>,
}

/// Things a view may want to redraw for. Folder ids are `None` for the company root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Signed in, signed out, or switched company. All navigation state was reset.
    SessionChanged,

    /// The folder index was replaced, successfully or with an empty list after a failure.
    FoldersLoaded,

    /// Selection moved to this folder and its documents are being fetched.
    FolderSelected(Option<FolderId>),

    /// The displayed document list now belongs to this folder. Not sent for discarded,
    /// superseded loads.
    DocumentsLoaded(Option<FolderId>),

    DocumentSelected(DocumentId),

    /// Fresh detail for this document was patched into every list holding it.
    DocumentUpdated(DocumentId),

    DocumentDeleted(DocumentId),

    UploadBatchCompleted { target: Option<FolderId>, succeeded: usize, failed: usize },

    SearchCompleted,
}

impl Default for EventSubs {
    fn default() -> Self {
        let (tx, _) = broadcast::channel::<Event>(1000);
        Self { tx }
    }
}

impl EventSubs {
    pub(crate) fn session_changed(&self) {
        self.queue(Event::SessionChanged);
    }

    pub(crate) fn folders_loaded(&self) {
        self.queue(Event::FoldersLoaded);
    }

    pub(crate) fn folder_selected(&self, id: Option<FolderId>) {
        self.queue(Event::FolderSelected(id));
    }

    pub(crate) fn documents_loaded(&self, id: Option<FolderId>) {
        self.queue(Event::DocumentsLoaded(id));
    }

    pub(crate) fn document_selected(&self, id: DocumentId) {
        self.queue(Event::DocumentSelected(id));
    }

    pub(crate) fn document_updated(&self, id: DocumentId) {
        self.queue(Event::DocumentUpdated(id));
    }

    pub(crate) fn document_deleted(&self, id: DocumentId) {
        self.queue(Event::DocumentDeleted(id));
    }

    pub(crate) fn upload_batch_completed(
        &self, target: Option<FolderId>, succeeded: usize, failed: usize,
    ) {
        self.queue(Event::UploadBatchCompleted { target, succeeded, failed });
    }

    pub(crate) fn search_completed(&self) {
        self.queue(Event::SearchCompleted);
    }

    fn queue(&self, evt: Event) {
        // no subscribers is the common case for headless use
        if self.tx.receiver_count() == 0 {
            return;
        }
        if let Err(e) = self.tx.send(evt.clone()) {
            error!(?evt, ?e, "could not queue");
        }
    }
}

impl Navigator {
    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.tx.subscribe()
    }
}
