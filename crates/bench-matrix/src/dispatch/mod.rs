//! Selection semantics and top-level wiring: which entries, which groups,
//! which subtests, which branches — and driving the matrix through the
//! branch runner and the process seam.

use crate::catalog::Registry;
use crate::error::MatrixError;
use crate::exec::ToolRunner;
use crate::matrix::{build_matrix, Invocation};
use crate::resolve::{binary_ids, resolve};
use crate::runner::{BranchRunner, RunPolicy};
use crate::scm::SourceControl;
use crate::types::TestEntry;
use tracing::{info, warn};

/// Everything the CLI selects. An empty `tests` list means every registered
/// entry, in registration order.
#[derive(Debug, Clone)]
pub struct Selection {
    pub tests: Vec<String>,
    pub groups: Vec<String>,
    pub subtests: Vec<String>,
    pub branches: Vec<String>,
    pub bare_groups: Vec<String>,
    pub scale: f64,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            tests: Vec::new(),
            groups: Vec::new(),
            subtests: Vec::new(),
            branches: Vec::new(),
            bare_groups: Vec::new(),
            scale: 1.0,
        }
    }
}

pub struct Dispatcher<'a, S: SourceControl, T: ToolRunner> {
    registry: &'a Registry,
    scm: &'a S,
    tools: &'a T,
    policy: RunPolicy,
    driver: String,
}

impl<'a, S: SourceControl, T: ToolRunner> Dispatcher<'a, S, T> {
    pub fn new(
        registry: &'a Registry,
        scm: &'a S,
        tools: &'a T,
        policy: RunPolicy,
        driver: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            scm,
            tools,
            policy,
            driver: driver.into(),
        }
    }

    /// Run the whole selected matrix. Entry lookup failures, template
    /// failures, checkout/build failures, and unlaunchable drivers abort;
    /// a driver that runs and exits non-zero does not.
    ///
    /// A branch iteration covers the whole selection: every selected entry
    /// runs under one checkout (and one rebuild, when configured) per
    /// branch.
    pub fn run(&self, selection: &Selection) -> Result<(), MatrixError> {
        let entries = self.selected_entries(selection)?;
        let branch_runner = BranchRunner::new(self.scm, self.tools, self.policy.clone());
        branch_runner.run_over_branches(&selection.branches, |label| {
            for entry in &entries {
                info!(entry = %entry.name, "running benchmark family");
                self.run_matrix(entry, &selection.groups, selection, label)?;
            }
            Ok(())
        })?;
        // Bare groups run once against the current checkout, whatever
        // branches were requested.
        if !selection.bare_groups.is_empty() {
            for entry in &entries {
                self.run_matrix(entry, &selection.bare_groups, selection, None)?;
            }
        }
        Ok(())
    }

    /// Resolve the test selection to entries, in the caller's order; with no
    /// explicit selection, every entry in registration order.
    pub fn selected_entries(
        &self,
        selection: &Selection,
    ) -> Result<Vec<&'a TestEntry>, MatrixError> {
        if selection.tests.is_empty() {
            Ok(self.registry.entries().collect())
        } else {
            selection
                .tests
                .iter()
                .map(|name| self.registry.lookup(name))
                .collect()
        }
    }

    fn run_matrix(
        &self,
        entry: &TestEntry,
        groups: &[String],
        selection: &Selection,
        branch_label: Option<&str>,
    ) -> Result<(), MatrixError> {
        let variants = resolve(entry, groups);
        if variants.is_empty() {
            warn!(entry = %entry.name, ?groups, "selection resolves to no binaries");
        }
        let binaries = binary_ids(entry, &variants);
        let invocations = build_matrix(
            entry,
            &binaries,
            selection.scale,
            &selection.subtests,
            branch_label,
            &self.driver,
        )?;
        for invocation in &invocations {
            self.dispatch(invocation)?;
        }
        Ok(())
    }

    fn dispatch(&self, invocation: &Invocation) -> Result<(), MatrixError> {
        let argv = invocation.argv();
        info!(command = %argv.join(" "), "dispatching driver");
        let success = self.tools.run_status(&argv)?;
        if !success {
            // Individual benchmark failures are tolerated; the rest of the
            // matrix still runs.
            warn!(command = %argv.join(" "), "driver reported failure");
        }
        Ok(())
    }
}

/// Pretty-printed view of the resolved (post-derivation) catalog for the
/// selected entries.
pub fn dump_catalog(entries: &[&TestEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Script {
        events: RefCell<Vec<String>>,
        driver_fails: bool,
    }

    impl SourceControl for Script {
        fn current_ref(&self) -> Result<String, MatrixError> {
            self.events.borrow_mut().push("current_ref".into());
            Ok("master".to_string())
        }

        fn checkout(&self, name: &str) -> Result<(), MatrixError> {
            self.events.borrow_mut().push(format!("checkout {name}"));
            Ok(())
        }
    }

    impl ToolRunner for Script {
        fn run_status(&self, argv: &[&str]) -> Result<bool, MatrixError> {
            self.events.borrow_mut().push(argv.join(" "));
            Ok(!self.driver_fails)
        }

        fn run_checked(&self, argv: &[&str]) -> Result<(), MatrixError> {
            self.run_status(argv).map(|_| ())
        }

        fn run_capture(&self, argv: &[&str]) -> Result<String, MatrixError> {
            self.run_checked(argv)?;
            Ok("master".to_string())
        }
    }

    fn selection() -> Selection {
        Selection {
            tests: vec!["ms_queue".to_string()],
            groups: vec!["fixed_epoch".to_string()],
            subtests: vec!["mpmc".to_string()],
            ..Selection::default()
        }
    }

    #[test]
    fn unknown_test_selection_is_fatal() {
        let registry = Registry::builtin();
        let script = Script::default();
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        let bad = Selection {
            tests: vec!["nope".to_string()],
            ..Selection::default()
        };
        assert!(matches!(
            dispatcher.run(&bad),
            Err(MatrixError::UnknownEntry(_))
        ));
        assert!(script.events.borrow().is_empty());
    }

    #[test]
    fn empty_test_selection_runs_all_entries_in_order() {
        let registry = Registry::builtin();
        let script = Script::default();
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        let names: Vec<&str> = dispatcher
            .selected_entries(&Selection::default())
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["ms_queue", "tstack"]);
    }

    #[test]
    fn driver_nonzero_exit_does_not_abort_the_matrix() {
        let registry = Registry::builtin();
        let script = Script {
            driver_fails: true,
            ..Script::default()
        };
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        let mut sel = selection();
        sel.subtests.clear(); // all four subtests
        dispatcher.run(&sel).unwrap();
        assert_eq!(script.events.borrow().len(), 4);
    }

    #[test]
    fn branchless_run_never_touches_source_control() {
        let registry = Registry::builtin();
        let script = Script::default();
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        dispatcher.run(&selection()).unwrap();
        let events = script.events.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("d 50 mpmc "));
    }

    #[test]
    fn one_branch_iteration_covers_every_selected_entry() {
        let registry = Registry::builtin();
        let script = Script::default();
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        let sel = Selection {
            groups: vec!["fixed_epoch".to_string()],
            subtests: vec!["mpmc".to_string()],
            branches: vec!["a".to_string()],
            ..Selection::default()
        };
        dispatcher.run(&sel).unwrap();
        let events = script.events.borrow();
        // One checkout serves both entries: the branch loop wraps the whole
        // selection, not each entry.
        assert_eq!(
            events.iter().filter(|e| *e == "current_ref").count(),
            1,
            "{events:?}"
        );
        assert_eq!(events.iter().filter(|e| *e == "checkout res-a").count(), 1);
        assert_eq!(events.iter().filter(|e| *e == "checkout master").count(), 1);
        assert!(events.iter().any(|e| e.contains("ms_queue-ec11-c11-test")));
        assert!(events.iter().any(|e| e.contains("tstack-ec11-c11-test")));
    }

    #[test]
    fn bare_groups_run_once_without_branch_label() {
        let registry = Registry::builtin();
        let script = Script::default();
        let dispatcher = Dispatcher::new(&registry, &script, &script, RunPolicy::default(), "d");
        let mut sel = selection();
        sel.groups.clear();
        sel.branches = vec!["a".to_string(), "b".to_string()];
        sel.bare_groups = vec!["rmc_only".to_string()];
        dispatcher.run(&sel).unwrap();
        let events = script.events.borrow();
        // Two branch iterations with labeled subtests, then one bare run.
        let labeled: Vec<&String> = events
            .iter()
            .filter(|e| e.contains("mpmc-a") || e.contains("mpmc-b"))
            .collect();
        assert_eq!(labeled.len(), 2);
        let bare: Vec<&String> = events
            .iter()
            .filter(|e| e.contains(" mpmc ") && e.contains("ms_queue-ermc-rmc-test"))
            .collect();
        assert_eq!(bare.len(), 1);
    }
}
