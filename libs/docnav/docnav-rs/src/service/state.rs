use std::collections::HashSet;
use std::sync::atomic::Ordering;

use uuid::Uuid;

use crate::model::document::Document;
use crate::model::folder::Folder;
use crate::model::ids::{DocumentId, FolderId};
use crate::model::session::Company;
use crate::Navigator;

/// Client-side view state for one signed-in company. Discarded whenever the session changes.
///
/// Loads are tagged with a ticket taken when they are issued. A response is applied only if its
/// ticket is still the newest one of its kind, which is what makes the last selection win over
/// older responses that arrive late.
#[derive(Default, Debug)]
pub struct NavState {
    pub folders: Vec<Folder>,
    pub folders_loading: bool,
    folders_ticket: u64,

    pub expanded: HashSet<FolderId>,
    /// `None` is the company root.
    pub selected_folder: Option<FolderId>,
    pub selected_document: Option<Document>,
    detail_ticket: u64,

    /// Documents of the selected folder.
    pub documents: Vec<Document>,
    pub documents_loading: bool,
    documents_ticket: u64,

    /// Documents and folders to emphasize, usually search hits.
    pub highlighted: HashSet<Uuid>,
    /// Documents returned by the most recent search.
    pub results: Vec<Document>,
    pub searching: bool,
    search_ticket: u64,

    pub drop_zone: DropZone,
}

/// Whether the drag-and-drop overlay is showing. Purely visual, it never decides whether
/// dropped files get uploaded.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub active: bool,
}

/// Which element a drag-leave came from. Leaves bubbling up from children of the drop zone
/// don't mean the pointer left the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Zone,
    Inner,
}

impl NavState {
    /// Back to a fresh state. Tickets keep counting so that anything still in flight from
    /// before the reset is discarded when it lands.
    pub(crate) fn reset(&mut self) {
        let tickets =
            (self.folders_ticket, self.detail_ticket, self.documents_ticket, self.search_ticket);
        *self = Self::default();
        self.folders_ticket = tickets.0 + 1;
        self.detail_ticket = tickets.1 + 1;
        self.documents_ticket = tickets.2 + 1;
        self.search_ticket = tickets.3 + 1;
    }

    pub(crate) fn begin_folders_load(&mut self) -> u64 {
        self.folders_ticket += 1;
        self.folders_loading = true;
        self.folders_ticket
    }

    pub(crate) fn is_current_folders_load(&self, ticket: u64) -> bool {
        self.folders_ticket == ticket
    }

    pub(crate) fn begin_documents_load(&mut self) -> u64 {
        self.documents_ticket += 1;
        self.documents_loading = true;
        self.documents_ticket
    }

    pub(crate) fn is_current_documents_load(&self, ticket: u64, folder: Option<FolderId>) -> bool {
        self.documents_ticket == ticket && self.selected_folder == folder
    }

    pub(crate) fn begin_detail_load(&mut self) -> u64 {
        self.detail_ticket += 1;
        self.detail_ticket
    }

    pub(crate) fn is_current_detail_load(&self, ticket: u64, id: DocumentId) -> bool {
        self.detail_ticket == ticket && self.selected_document_id() == Some(id)
    }

    pub(crate) fn begin_search(&mut self) -> u64 {
        self.search_ticket += 1;
        self.searching = true;
        self.search_ticket
    }

    pub(crate) fn is_current_search(&self, ticket: u64) -> bool {
        self.search_ticket == ticket
    }

    pub fn selected_document_id(&self) -> Option<DocumentId> {
        self.selected_document.as_ref().map(|d| d.id)
    }

    /// Swaps fresh detail for `doc` into every list that holds it, leaving other entries
    /// untouched. A document that moved out of the selected folder leaves the folder list.
    pub(crate) fn apply_update(&mut self, doc: &Document) {
        if self.selected_document_id() == Some(doc.id) {
            self.selected_document = Some(doc.clone());
        }

        if doc.folder_id == self.selected_folder {
            replace_in_place(&mut self.documents, doc);
        } else {
            self.documents.retain(|d| d.id != doc.id);
        }
        replace_in_place(&mut self.results, doc);
    }

    /// Forgets `id` everywhere: selection, folder list, search results and highlights.
    pub(crate) fn apply_removal(&mut self, id: DocumentId) {
        if self.selected_document_id() == Some(id) {
            self.selected_document = None;
        }
        self.documents.retain(|d| d.id != id);
        self.results.retain(|d| d.id != id);
        self.highlighted.remove(&id);
    }
}

fn replace_in_place(list: &mut [Document], doc: &Document) {
    for entry in list.iter_mut().filter(|d| d.id == doc.id) {
        *entry = doc.clone();
    }
}

/// A snapshot of what the navigator is busy with, for spinners and the like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub signed_in: bool,
    pub company: Option<Company>,
    pub folders_loading: bool,
    pub documents_loading: bool,
    pub searching: bool,
    pub uploading: bool,
}

impl Navigator {
    pub async fn status(&self) -> Status {
        let session = self.session.read().await;
        let state = self.state.read().await;
        Status {
            signed_in: session.is_some(),
            company: session.as_ref().and_then(|s| s.company.clone()),
            folders_loading: state.folders_loading,
            documents_loading: state.documents_loading,
            searching: state.searching,
            uploading: self.uploads.load(Ordering::SeqCst) > 0,
        }
    }
}
