//! Branch-switch orchestration: repeat a run callback across named branches
//! of the external checkout, restoring the original reference after each
//! successful iteration.
//!
//! Failure semantics are deliberately fail-fast with no rollback: restore
//! only runs as the last step of a successful iteration, so a failure after
//! a successful checkout strands the external repository on the failed
//! branch. That state is surfaced in the log, never silently repaired.

use crate::error::MatrixError;
use crate::exec::ToolRunner;
use crate::scm::SourceControl;
use tracing::{error, info};

/// Prefix prepended to a branch label to form the actual ref name.
pub const BRANCH_PREFIX: &str = "res-";

/// Per-branch behavior between checkout and callback. Rebuilding is a
/// configuration choice, off by default; when enabled the build tool runs
/// in the current working directory with no arguments.
#[derive(Debug, Clone)]
pub struct RunPolicy {
    pub rebuild: bool,
    pub build_argv: Vec<String>,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            rebuild: false,
            build_argv: vec!["make".to_string()],
        }
    }
}

pub struct BranchRunner<'a, S: SourceControl, T: ToolRunner> {
    scm: &'a S,
    tools: &'a T,
    policy: RunPolicy,
}

impl<'a, S: SourceControl, T: ToolRunner> BranchRunner<'a, S, T> {
    pub fn new(scm: &'a S, tools: &'a T, policy: RunPolicy) -> Self {
        Self { scm, tools, policy }
    }

    /// Run `callback` once per requested branch, in order; with no branches,
    /// run it exactly once against whatever is currently checked out and
    /// touch the source-control state not at all.
    pub fn run_over_branches<F>(
        &self,
        branches: &[String],
        mut callback: F,
    ) -> Result<(), MatrixError>
    where
        F: FnMut(Option<&str>) -> Result<(), MatrixError>,
    {
        if branches.is_empty() {
            return callback(None);
        }

        let original = self.scm.current_ref()?;
        info!(original = %original, "captured current reference");

        for branch in branches {
            let target = format!("{BRANCH_PREFIX}{branch}");
            info!(branch = %branch, target = %target, "checking out");
            self.scm.checkout(&target)?;

            let iteration = self
                .rebuild_if_configured()
                .and_then(|()| callback(Some(branch.as_str())));
            if let Err(e) = iteration {
                error!(
                    branch = %branch,
                    stranded_ref = %target,
                    "aborting; checkout left on failed branch"
                );
                return Err(e);
            }

            self.scm.checkout(&original)?;
        }
        Ok(())
    }

    fn rebuild_if_configured(&self) -> Result<(), MatrixError> {
        if !self.policy.rebuild {
            return Ok(());
        }
        let argv: Vec<&str> = self.policy.build_argv.iter().map(String::as_str).collect();
        info!(command = %argv.join(" "), "rebuilding");
        self.tools.run_checked(&argv)
    }
}
