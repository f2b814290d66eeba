use serde::{Deserialize, Serialize};

use super::ids::{self, CompanyId, FolderId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Folder {
    pub id: FolderId,
    pub company_id: CompanyId,
    /// `None` for folders at the top level of the company.
    #[serde(default, with = "ids::optional_id")]
    pub parent_folder_id: Option<FolderId>,
    pub name: String,
    /// Aggregate size in bytes of everything below this folder.
    #[serde(default)]
    pub size: u64,
    /// Aggregate number of items below this folder.
    #[serde(default)]
    pub count: u64,
}

impl Folder {
    pub fn is_top_level(&self) -> bool {
        self.parent_folder_id.is_none()
    }
}
