//! Group derivation: expand a partially specified group map into the full
//! set of comparison groups.
//!
//! Each rule fires only when its target key is absent, so explicit
//! definitions always win and re-running derivation is a no-op. Rule order
//! is load-bearing: later rules read the outputs of earlier ones.

use crate::types::Variant;
use indexmap::IndexMap;

/// Ordered group map of a catalog entry.
pub type GroupMap = IndexMap<String, Vec<Variant>>;

/// Memory-model tags the per-model groups are derived for.
pub const MEMORY_MODELS: &[&str] = &["c11", "rmc", "sc"];

/// Tag marking experimental-model variants. Matched by substring, so it also
/// catches suffixed spellings like "ermc" and "rmc2".
pub const EXPERIMENTAL_TAG: &str = "rmc";

/// Fill in every implicit group of `groups` in place.
pub fn derive_groups(groups: &mut GroupMap) {
    concat_rule(groups, "fixed_lib", &["fixed_epoch", "fixed_freelist"]);
    concat_rule(groups, "matched_lib", &["matched_epoch", "matched_freelist"]);
    filter_rule(groups, "baseline", "matched_lib", |v| {
        !v.tag_match(EXPERIMENTAL_TAG)
    });
    concat_rule(groups, "sensible", &["fixed_lib", "matched_lib", "fixed_object"]);
    filter_rule(groups, "sensible_rmc", "sensible", |v| {
        v.tag_match(EXPERIMENTAL_TAG)
    });
    for model in MEMORY_MODELS {
        for (kind, source) in [
            ("epoch", "matched_epoch"),
            ("freelist", "matched_freelist"),
            ("only", "matched_lib"),
        ] {
            filter_rule(groups, &format!("{model}_{kind}"), source, |v| {
                v.tag_match(model)
            });
        }
    }
    singleton_rule(groups);
}

/// `target` := concatenation of the named source groups, in order, without
/// deduplication. An absent source contributes the empty sequence.
fn concat_rule(groups: &mut GroupMap, target: &str, sources: &[&str]) {
    if groups.contains_key(target) {
        return;
    }
    let combined: Vec<Variant> = sources
        .iter()
        .filter_map(|s| groups.get(*s))
        .flatten()
        .cloned()
        .collect();
    groups.insert(target.to_string(), combined);
}

/// `target` := the subsequence of `source` whose variants satisfy `keep`.
fn filter_rule<F>(groups: &mut GroupMap, target: &str, source: &str, keep: F)
where
    F: Fn(&Variant) -> bool,
{
    if groups.contains_key(target) {
        return;
    }
    let filtered: Vec<Variant> = groups
        .get(source)
        .map(|vs| vs.iter().filter(|v| keep(v)).cloned().collect())
        .unwrap_or_default();
    groups.insert(target.to_string(), filtered);
}

/// Every distinct variant in any group gets a singleton group keyed by its
/// hyphen-joined tags, so a single exact binary is always addressable.
fn singleton_rule(groups: &mut GroupMap) {
    let mut distinct: Vec<Variant> = Vec::new();
    for vs in groups.values() {
        for v in vs {
            if !distinct.contains(v) {
                distinct.push(v.clone());
            }
        }
    }
    for v in distinct {
        let key = v.key();
        if !groups.contains_key(&key) {
            groups.insert(key, vec![v]);
        }
    }
}
