//! Core value types for the benchmark catalog.
//!
//! A catalog entry describes one benchmark family: its subtests (argument
//! templates), its variant groups (which compiled binaries belong together in
//! a comparison), and the parameters the templates draw from. Entries are
//! immutable once registered.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Suffix appended to every binary identifier.
pub const BINARY_SUFFIX: &str = "test";

/// One compiled benchmark variant, identified by an ordered tag sequence
/// (e.g. an allocation-strategy tag plus a memory-model tag).
///
/// Variants compare by full structural equality. `Ord` exists so variant
/// sets have a fixed materialization order per invocation; no caller may
/// read meaning into that order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Variant(Vec<String>);

impl Variant {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Substring tag match: `tag` matches this variant if it is contained in
    /// *any one* of its elements. Deliberately looser than equality — "rmc"
    /// matches both "ermc" and "rmc2". Group membership downstream depends on
    /// exactly these semantics, so this must never be tightened to equality.
    pub fn tag_match(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.contains(tag))
    }

    /// Hyphen-joined tags; keys the singleton group addressing exactly this
    /// variant.
    pub fn key(&self) -> String {
        self.0.join("-")
    }

    /// Deterministic binary identifier under `entry_name`:
    /// `<entry>-<tag>..-test`. Never validated against what was actually
    /// built.
    pub fn binary_id(&self, entry_name: &str) -> String {
        let mut parts = Vec::with_capacity(self.0.len() + 2);
        parts.push(entry_name);
        parts.extend(self.0.iter().map(String::as_str));
        parts.push(BINARY_SUFFIX);
        parts.join("-")
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A template/catalog parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Numeric view, for the base run count.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(n) => Some(*n as f64),
            ParamValue::Float(x) => Some(*x),
            ParamValue::Str(_) => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

/// Parameter name every entry must bind: the unscaled run count.
pub const BASE_RUNS_PARAM: &str = "base_runs";

/// One benchmark family in the catalog.
///
/// `subtests` and `groups` are insertion-ordered maps: subtests run in
/// definition order, and group order is kept for display. Group *contents*
/// are eventually consumed with set semantics.
#[derive(Debug, Clone, Serialize)]
pub struct TestEntry {
    pub name: String,
    pub subtests: IndexMap<String, String>,
    pub groups: IndexMap<String, Vec<Variant>>,
    pub params: IndexMap<String, ParamValue>,
}

impl TestEntry {
    pub fn new(
        name: impl Into<String>,
        subtests: IndexMap<String, String>,
        groups: IndexMap<String, Vec<Variant>>,
        params: IndexMap<String, ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            subtests,
            groups,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_match_is_substring_not_equality() {
        let v = Variant::new(["ermc", "rmc2"]);
        assert!(v.tag_match("rmc"));
        assert!(v.tag_match("rmc2"));
        assert!(v.tag_match("ermc"));
        assert!(!v.tag_match("sc"));

        let w = Variant::new(["ec11simp", "c11"]);
        assert!(w.tag_match("c11"));
        assert!(w.tag_match("c11simp"));
    }

    #[test]
    fn binary_id_joins_name_tags_and_suffix() {
        let v = Variant::new(["ec11", "c11"]);
        assert_eq!(v.binary_id("ms_queue"), "ms_queue-ec11-c11-test");
    }

    #[test]
    fn equal_variants_yield_equal_ids() {
        let a = Variant::new(["fc11", "rmc2"]);
        let b = Variant::new(["fc11", "rmc2"]);
        assert_eq!(a, b);
        assert_eq!(a.binary_id("tstack"), b.binary_id("tstack"));
    }

    #[test]
    fn key_is_hyphen_join() {
        assert_eq!(Variant::new(["esc", "sc"]).key(), "esc-sc");
    }
}
