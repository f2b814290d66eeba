//! Identifiers and the one rule for "lives at the company root".
//!
//! The api is not consistent about how it says "no parent": a parent reference may be missing,
//! `null`, or an empty string. All three mean the same thing, and this module is the only place
//! that knows it. Everything downstream sees an `Option<Uuid>`.

use serde::{Deserialize, Deserializer, Serializer};
use uuid::Uuid;

pub type CompanyId = Uuid;
pub type FolderId = Uuid;
pub type DocumentId = Uuid;
pub type TagId = Uuid;
pub type SenderId = Uuid;
pub type UserId = Uuid;

/// Collapses the three spellings of "no parent" into `None`.
pub fn normalize_parent(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

/// `serde(with = "optional_id")` for parent / folder references. Pair it with `serde(default)`
/// so a missing field deserializes too.
pub mod optional_id {
    use super::*;

    pub fn serialize<S>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_some(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match normalize_parent(raw.as_deref()) {
            Some(s) => Uuid::parse_str(s.trim())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
