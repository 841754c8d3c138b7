//! Named cache partitions, one per resource class.
//!
//! Partitions never share entries. The store itself accepts arbitrary
//! partition names so that partitions left behind by older agent versions
//! can still be found and reclaimed; this enum is the set the current
//! version writes to.

use serde::{Deserialize, Serialize};

/// The fixed partition set for the current agent version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Documents,
    Images,
    Scripts,
    Styles,
}

impl Partition {
    /// All partitions the current version references.
    ///
    /// Anything else found in the store is stale and eligible for
    /// reclamation on activation.
    pub const ALL: [Partition; 4] = [
        Partition::Documents,
        Partition::Images,
        Partition::Scripts,
        Partition::Styles,
    ];

    /// Stable partition name used as the store key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Documents => "documents",
            Partition::Images => "images",
            Partition::Scripts => "scripts",
            Partition::Styles => "styles",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
