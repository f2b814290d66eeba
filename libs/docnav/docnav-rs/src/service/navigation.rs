use std::collections::HashSet;

use uuid::Uuid;

use crate::model::document::Document;
use crate::model::errors::NavResult;
use crate::model::folder::Folder;
use crate::model::ids::FolderId;
use crate::model::tree::FolderTree;
use crate::Navigator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// The company root. Not a real folder, selecting it selects `None`.
    Root,
    Folder(Folder),
}

impl TreeNode {
    pub fn id(&self) -> Option<FolderId> {
        match self {
            TreeNode::Root => None,
            TreeNode::Folder(f) => Some(f.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Root => "root",
            TreeNode::Folder(f) => &f.name,
        }
    }
}

/// One line of the rendered tree, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node: TreeNode,
    pub depth: usize,
    pub expanded: bool,
    pub selected: bool,
    pub highlighted: bool,
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub document: Document,
    pub selected: bool,
    pub highlighted: bool,
}

impl Navigator {
    /// Expands or collapses `id`. Selection is left alone.
    pub async fn toggle(&self, id: FolderId) {
        let mut state = self.state.write().await;
        if !state.expanded.remove(&id) {
            state.expanded.insert(id);
        }
    }

    /// Moves the selection to `folder` (`None` is root), clears the selected document, expands
    /// the folder and loads its documents. Every call issues exactly one load; when selections
    /// overlap only the newest one's documents are kept.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn select_folder(&self, folder: Option<FolderId>) -> NavResult<Vec<Document>> {
        let (session, company) = self.company_session().await?;

        let ticket = {
            let mut state = self.state.write().await;
            if let Some(id) = folder {
                state.expanded.insert(id);
            }
            if state.selected_folder != folder {
                state.documents.clear();
            }
            state.selected_folder = folder;
            state.selected_document = None;
            state.begin_documents_load()
        };
        self.events.folder_selected(folder);

        self.fetch_documents(&session, company, folder, Some(ticket))
            .await
    }

    pub async fn selected_folder(&self) -> Option<FolderId> {
        self.state.read().await.selected_folder
    }

    pub async fn expanded(&self) -> HashSet<FolderId> {
        self.state.read().await.expanded.clone()
    }

    /// The tree as it should be drawn right now: depth first from the top level, descending
    /// only into expanded folders. With [crate::Config::show_root] a root row comes first.
    pub async fn tree_rows(&self) -> Vec<TreeRow> {
        let state = self.state.read().await;
        let mut rows = vec![];

        if self.config.show_root {
            rows.push(TreeRow {
                node: TreeNode::Root,
                depth: 0,
                expanded: true,
                selected: state.selected_folder.is_none(),
                highlighted: false,
                has_children: !state.folders.children_of(None).is_empty(),
            });
        }

        for entry in state.folders.build_tree(&state.expanded, None) {
            let id = entry.folder.id;
            rows.push(TreeRow {
                node: TreeNode::Folder(entry.folder.clone()),
                depth: entry.depth,
                expanded: state.expanded.contains(&id),
                selected: state.selected_folder == Some(id),
                highlighted: state.highlighted.contains(&id),
                has_children: !state.folders.children_of(Some(id)).is_empty(),
            });
        }

        rows
    }

    pub async fn document_rows(&self) -> Vec<DocumentRow> {
        let state = self.state.read().await;
        let selected = state.selected_document_id();
        state
            .documents
            .iter()
            .map(|doc| DocumentRow {
                document: doc.clone(),
                selected: selected == Some(doc.id),
                highlighted: state.highlighted.contains(&doc.id),
            })
            .collect()
    }

    /// Ids of folders and documents to emphasize. Display only.
    pub async fn set_highlighted<I: IntoIterator<Item = Uuid>>(&self, ids: I) {
        self.state.write().await.highlighted = ids.into_iter().collect();
    }

    pub async fn clear_highlighted(&self) {
        self.state.write().await.highlighted.clear();
    }

    pub async fn highlighted(&self) -> HashSet<Uuid> {
        self.state.read().await.highlighted.clone()
    }
}
