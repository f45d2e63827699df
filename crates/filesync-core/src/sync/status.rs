//! Live copy status

use serde::{Deserialize, Serialize};

/// Result of comparing an origin with one copy on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyStatus {
    /// The copy path is not a regular file
    #[serde(rename = "no copy")]
    NoCopy,
    /// Origin and copy have identical content
    #[serde(rename = "same")]
    Same,
    /// Origin and copy content differ
    #[serde(rename = "different")]
    Different,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCopy => "no copy",
            Self::Same => "same",
            Self::Different => "different",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
