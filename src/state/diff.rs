use std::collections::HashSet;

use crate::state::state_model::{CertificateId, CertificateIdSet};

/// Result of comparing two certificate-ID snapshots.
///
/// Both lists keep the order in which the IDs appear in their own snapshot,
/// so the outcome is deterministic even though the comparison is set-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdDiff {
    pub added: Vec<CertificateId>,
    pub removed: Vec<CertificateId>,
}

impl IdDiff {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn diff_ids(before: &CertificateIdSet, after: &CertificateIdSet) -> IdDiff {
    let before_ids: HashSet<_> = before.iter().collect();
    let after_ids: HashSet<_> = after.iter().collect();

    let added = after
        .iter()
        .filter(|id| !before_ids.contains(id))
        .cloned()
        .collect();

    let removed = before
        .iter()
        .filter(|id| !after_ids.contains(id))
        .cloned()
        .collect();

    IdDiff { added, removed }
}
