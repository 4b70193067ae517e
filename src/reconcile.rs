//! Diff of a source catalogue against a locale catalogue by message id.

use std::collections::HashSet;

use crate::catalogue::{Catalogue, MessageRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// In the source but not the locale, source order
    pub added: Vec<MessageRecord>,
    /// In the locale but not the source, locale order
    pub removed: Vec<MessageRecord>,
}

impl Reconciliation {
    pub fn is_in_sync(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added_ids(&self) -> Vec<String> {
        self.added.iter().map(|record| record.id.clone()).collect()
    }

    pub fn removed_ids(&self) -> Vec<String> {
        self.removed.iter().map(|record| record.id.clone()).collect()
    }
}

/// Compare `source` with `reference`.
///
/// Catalogues with the same number of records are taken to be in sync and no
/// ids are compared. A rename that keeps the count unchanged therefore goes
/// unnoticed; use [`reconcile_strict`] to always compare ids.
pub fn reconcile(source: &Catalogue, reference: &Catalogue) -> Reconciliation {
    if source.len() == reference.len() {
        return Reconciliation::default();
    }
    reconcile_strict(source, reference)
}

/// Compare ids of `source` and `reference` without the length shortcut.
pub fn reconcile_strict(source: &Catalogue, reference: &Catalogue) -> Reconciliation {
    let source_ids: HashSet<&str> = source.ids().collect();
    let reference_ids: HashSet<&str> = reference.ids().collect();

    let added = source
        .units
        .iter()
        .filter(|record| !reference_ids.contains(record.id.as_str()))
        .cloned()
        .collect();
    let removed = reference
        .units
        .iter()
        .filter(|record| !source_ids.contains(record.id.as_str()))
        .cloned()
        .collect();

    Reconciliation { added, removed }
}
