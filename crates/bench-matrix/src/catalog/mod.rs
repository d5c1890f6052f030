//! The test registry and the built-in benchmark catalog.
//!
//! The registry is an explicit value built once at startup and passed by
//! reference to the dispatcher; it is never mutated after initialization.
//! `register` runs group derivation exactly once, at insertion time.

use crate::derive::{derive_groups, MEMORY_MODELS};
use crate::error::MatrixError;
use crate::types::{ParamValue, TestEntry, Variant, BASE_RUNS_PARAM};
use indexmap::IndexMap;

/// Process-wide catalog of benchmark families, keyed by entry name.
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, TestEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the entry's implicit groups, then store it. Registering a name
    /// twice silently replaces the earlier entry; callers own uniqueness.
    pub fn register(&mut self, mut entry: TestEntry) {
        derive_groups(&mut entry.groups);
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn lookup(&self, name: &str) -> Result<&TestEntry, MatrixError> {
        self.entries
            .get(name)
            .ok_or_else(|| MatrixError::UnknownEntry(name.to_string()))
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &TestEntry> {
        self.entries.values()
    }

    /// The built-in catalog: the lock-free data structures benchmarked
    /// across memory-model compilation strategies.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(data_struct_entry("ms_queue"));
        registry.register(data_struct_entry("tstack"));
        registry
    }
}

/// One data-structure benchmark family. All of them share the same subtest
/// load patterns and variant layout; only the name differs.
fn data_struct_entry(name: &str) -> TestEntry {
    let mut subtests = IndexMap::new();
    subtests.insert("mpmc".to_string(), "-p 2 -c 2 -n %(size)d".to_string());
    subtests.insert("spsc".to_string(), "-p 1 -c 1 -n %(size)d".to_string());
    subtests.insert("spmc".to_string(), "-p 1 -c 2 -n %(size)d".to_string());
    subtests.insert(
        "hammer".to_string(),
        "-p 0 -c 0 -t 4 -n %(size)d".to_string(),
    );

    let mut groups = IndexMap::new();
    groups.insert(
        "fixed_epoch".to_string(),
        MEMORY_MODELS
            .iter()
            .map(|m| Variant::new(["ec11".to_string(), m.to_string()]))
            .collect(),
    );
    groups.insert(
        "fixed_freelist".to_string(),
        MEMORY_MODELS
            .iter()
            .map(|m| Variant::new(["fc11".to_string(), format!("{m}2")]))
            .collect(),
    );
    groups.insert(
        "matched_epoch".to_string(),
        MEMORY_MODELS
            .iter()
            .map(|m| Variant::new([format!("e{m}"), m.to_string()]))
            .collect(),
    );
    groups.insert(
        "matched_freelist".to_string(),
        MEMORY_MODELS
            .iter()
            .map(|m| Variant::new([format!("f{m}"), format!("{m}2")]))
            .collect(),
    );
    // Object code pinned to c11 while the library varies, including the
    // simplified c11 build.
    groups.insert(
        "fixed_object".to_string(),
        MEMORY_MODELS
            .iter()
            .copied()
            .chain(["c11simp"])
            .map(|m| Variant::new([format!("e{m}"), "c11".to_string()]))
            .collect(),
    );

    let mut params = IndexMap::new();
    params.insert("size".to_string(), ParamValue::Int(10_000_000));
    params.insert(BASE_RUNS_PARAM.to_string(), ParamValue::Int(50));

    TestEntry::new(name, subtests, groups, params)
}
