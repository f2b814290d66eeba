use std::collections::HashSet;

use super::errors::{NavErrKind, NavResult};
use super::folder::Folder;
use super::ids::FolderId;

/// One visible row of the folder tree: the folder and how deep it sits below the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry<'a> {
    pub folder: &'a Folder,
    pub depth: usize,
}

/// Read-only views over a flat set of folders. Nothing is cached: adjacency is derived on each
/// call so an edited folder list is reflected immediately.
pub trait FolderTree {
    fn folders(&self) -> &[Folder];

    fn maybe_find(&self, id: &FolderId) -> Option<&Folder> {
        self.folders().iter().find(|f| &f.id == id)
    }

    fn find(&self, id: &FolderId) -> NavResult<&Folder> {
        self.maybe_find(id)
            .ok_or_else(|| NavErrKind::FolderNonexistent.into())
    }

    /// Folders whose parent is exactly `parent`; `None` yields the top level.
    fn children_of(&self, parent: Option<FolderId>) -> Vec<&Folder> {
        self.folders()
            .iter()
            .filter(|f| f.parent_folder_id == parent)
            .collect()
    }

    /// Parent chain of `id`, nearest first, not including `id` itself. Stops at the top level,
    /// at a dangling parent reference, or if the chain loops back on itself.
    fn ancestors(&self, id: &FolderId) -> Vec<FolderId> {
        let mut chain = vec![];
        let mut seen = HashSet::from([*id]);
        let mut current = self.maybe_find(id).and_then(|f| f.parent_folder_id);
        while let Some(parent) = current {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = self.maybe_find(&parent).and_then(|f| f.parent_folder_id);
        }
        chain
    }

    fn is_same_or_descendant(&self, id: &FolderId, ancestor: &FolderId) -> bool {
        id == ancestor || self.ancestors(id).contains(ancestor)
    }

    /// Depth-first listing of the folders visible below `parent`. A folder's children are
    /// listed only while the folder is in `expanded`; sibling order is the order of the flat set.
    fn build_tree(
        &self, expanded: &HashSet<FolderId>, parent: Option<FolderId>,
    ) -> Vec<TreeEntry<'_>> {
        let mut rows = vec![];
        let mut visited = HashSet::new();
        self.walk(expanded, parent, 0, &mut visited, &mut rows);
        rows
    }

    #[doc(hidden)]
    fn walk<'a>(
        &'a self, expanded: &HashSet<FolderId>, parent: Option<FolderId>, depth: usize,
        visited: &mut HashSet<FolderId>, rows: &mut Vec<TreeEntry<'a>>,
    ) {
        for folder in self.children_of(parent) {
            // a parent cycle would otherwise recurse forever
            if !visited.insert(folder.id) {
                continue;
            }
            rows.push(TreeEntry { folder, depth });
            if expanded.contains(&folder.id) {
                self.walk(expanded, Some(folder.id), depth + 1, visited, rows);
            }
        }
    }
}

impl FolderTree for [Folder] {
    fn folders(&self) -> &[Folder] {
        self
    }
}

impl FolderTree for Vec<Folder> {
    fn folders(&self) -> &[Folder] {
        self
    }
}

#[cfg(test)]
mod unit_tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::FolderTree;
    use crate::model::folder::Folder;

    fn folder(name: &str, parent: Option<Uuid>) -> Folder {
        Folder {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            parent_folder_id: parent,
            name: name.to_string(),
            size: 0,
            count: 0,
        }
    }

    fn names(rows: &[super::TreeEntry]) -> Vec<(String, usize)> {
        rows.iter()
            .map(|r| (r.folder.name.clone(), r.depth))
            .collect()
    }

    #[test]
    fn collapsed_tree_shows_top_level_only() {
        let a = folder("a", None);
        let b = folder("b", Some(a.id));
        let c = folder("c", None);
        let folders = vec![a, b, c];

        let rows = folders.build_tree(&HashSet::new(), None);
        assert_eq!(names(&rows), vec![("a".into(), 0), ("c".into(), 0)]);
    }

    #[test]
    fn expanded_chain_is_indented_by_depth() {
        let a = folder("a", None);
        let b = folder("b", Some(a.id));
        let c = folder("c", Some(b.id));
        let d = folder("d", None);
        let expanded = HashSet::from([a.id, b.id]);
        let folders = vec![a, b, c, d];

        let rows = folders.build_tree(&expanded, None);
        assert_eq!(
            names(&rows),
            vec![("a".into(), 0), ("b".into(), 1), ("c".into(), 2), ("d".into(), 0)]
        );
    }

    #[test]
    fn collapsed_ancestor_hides_expanded_descendant() {
        let a = folder("a", None);
        let b = folder("b", Some(a.id));
        let c = folder("c", Some(b.id));
        let expanded = HashSet::from([b.id]);
        let folders = vec![a, b, c];

        let rows = folders.build_tree(&expanded, None);
        assert_eq!(names(&rows), vec![("a".into(), 0)]);
    }

    #[test]
    fn children_of_matches_parent_exactly() {
        let a = folder("a", None);
        let b = folder("b", Some(a.id));
        let folders = vec![a.clone(), b.clone()];

        for f in &folders {
            assert!(folders.children_of(f.parent_folder_id).contains(&f));
        }
        assert!(folders
            .children_of(None)
            .iter()
            .all(|f| f.parent_folder_id.is_none()));
        assert_eq!(folders.children_of(Some(a.id)), vec![&b]);
    }

    #[test]
    fn cycles_terminate() {
        let mut a = folder("a", None);
        let b = folder("b", Some(a.id));
        a.parent_folder_id = Some(b.id);
        let expanded = HashSet::from([a.id, b.id]);
        let folders = vec![a.clone(), b];

        assert!(folders.build_tree(&expanded, Some(a.id)).len() <= 2);
        assert_eq!(folders.ancestors(&a.id).len(), 1);
    }

    #[test]
    fn ancestry() {
        let a = folder("a", None);
        let b = folder("b", Some(a.id));
        let c = folder("c", Some(b.id));
        let folders = vec![a.clone(), b.clone(), c.clone()];

        assert_eq!(folders.ancestors(&c.id), vec![b.id, a.id]);
        assert!(folders.is_same_or_descendant(&c.id, &a.id));
        assert!(folders.is_same_or_descendant(&a.id, &a.id));
        assert!(!folders.is_same_or_descendant(&a.id, &c.id));
    }
}
