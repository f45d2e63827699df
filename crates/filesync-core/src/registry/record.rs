use filesync_fs::Digest;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The full persisted document: canonical origin path → origin record,
/// in insertion order.
pub type RegistryDocument = IndexMap<String, OriginRecord>;

/// A registered origin and its copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRecord {
    /// Last stored digest of the origin, `None` until first hashed
    pub hash: Option<Digest>,
    /// Canonical copy path → copy record, in insertion order
    #[serde(default)]
    pub copies: IndexMap<String, CopyRecord>,
}

impl OriginRecord {
    /// Copy keys whose stored digest differs from this origin's.
    ///
    /// A missing digest on either side counts as different.
    pub fn changed_copies(&self) -> impl Iterator<Item = &String> {
        self.copies
            .iter()
            .filter(|(_, copy)| !digests_match(self.hash.as_ref(), copy.hash.as_ref()))
            .map(|(key, _)| key)
    }
}

/// A registered copy destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRecord {
    /// Last stored digest of the copy, `None` until the file exists and is hashed
    pub hash: Option<Digest>,
}

pub(crate) fn digests_match(origin: Option<&Digest>, copy: Option<&Digest>) -> bool {
    matches!((origin, copy), (Some(a), Some(b)) if a == b)
}
