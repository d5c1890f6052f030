//! Binary-set resolution: selected group names -> deduplicated variant set.

use crate::types::{TestEntry, Variant};
use std::collections::BTreeSet;
use tracing::debug;

/// Union the variants of every selected group, deduplicating structurally.
/// A name with no matching group contributes nothing and is not an error.
pub fn resolve<S: AsRef<str>>(entry: &TestEntry, selected: &[S]) -> BTreeSet<Variant> {
    let mut set = BTreeSet::new();
    for name in selected {
        match entry.groups.get(name.as_ref()) {
            Some(variants) => set.extend(variants.iter().cloned()),
            None => debug!(
                entry = %entry.name,
                group = name.as_ref(),
                "selected group not defined; contributes no binaries"
            ),
        }
    }
    set
}

/// Materialize the set as binary identifiers, in the set's fixed iteration
/// order. The order carries no meaning.
pub fn binary_ids(entry: &TestEntry, variants: &BTreeSet<Variant>) -> Vec<String> {
    variants.iter().map(|v| v.binary_id(&entry.name)).collect()
}
