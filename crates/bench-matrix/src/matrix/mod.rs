//! Command-matrix construction: one driver invocation per selected subtest.

mod template;

pub use template::resolve_template;

use crate::error::MatrixError;
use crate::types::{TestEntry, BASE_RUNS_PARAM};

/// Default benchmark driver. It receives the run count, the (possibly
/// branch-labeled) subtest name, the resolved argument string, and the
/// binary identifiers to exercise.
pub const DEFAULT_DRIVER: &str = "./scripts/bench.sh";

/// One external driver invocation, as a structured argument vector. Never
/// passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Full argv, program first. For spawning and for debug logging.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Scaled run count: `ceil(scale * base_runs)`. Exact ceiling semantics, so
/// any positive scale yields at least one run.
pub fn run_count(entry: &TestEntry, scale: f64) -> Result<u64, MatrixError> {
    let base = entry
        .params
        .get(BASE_RUNS_PARAM)
        .and_then(|p| p.as_f64())
        .ok_or_else(|| MatrixError::Param {
            entry: entry.name.clone(),
            name: BASE_RUNS_PARAM.to_string(),
        })?;
    Ok((scale * base).ceil() as u64)
}

/// Build the invocation sequence for `entry`: one per subtest, in the
/// entry's definition order, filtered (never reordered) by `subtest_filter`.
pub fn build_matrix<S: AsRef<str>>(
    entry: &TestEntry,
    binaries: &[String],
    scale: f64,
    subtest_filter: &[S],
    branch_label: Option<&str>,
    driver: &str,
) -> Result<Vec<Invocation>, MatrixError> {
    let runs = run_count(entry, scale)?;
    let mut invocations = Vec::new();
    for (subtest, arg_template) in &entry.subtests {
        if !subtest_filter.is_empty() && !subtest_filter.iter().any(|s| s.as_ref() == subtest) {
            continue;
        }
        let labeled = match branch_label {
            Some(branch) => format!("{subtest}-{branch}"),
            None => subtest.clone(),
        };
        let resolved = resolve_template(arg_template, &entry.params)?;
        let mut args = vec![runs.to_string(), labeled, resolved];
        args.extend(binaries.iter().cloned());
        invocations.push(Invocation {
            program: driver.to_string(),
            args,
        });
    }
    Ok(invocations)
}
