//! Source-control collaborator: read the current reference, check out by
//! name. Nothing else about the repository is this crate's business.

use crate::error::MatrixError;
use crate::exec::ToolRunner;

pub trait SourceControl {
    /// The currently checked-out reference (branch name, or a detached ref).
    fn current_ref(&self) -> Result<String, MatrixError>;

    /// Check out the named reference. Failure is fatal for the caller.
    fn checkout(&self, name: &str) -> Result<(), MatrixError>;
}

/// Git via its CLI, through the process seam.
pub struct GitCli<'a, R: ToolRunner> {
    runner: &'a R,
}

impl<'a, R: ToolRunner> GitCli<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: ToolRunner> SourceControl for GitCli<'_, R> {
    fn current_ref(&self) -> Result<String, MatrixError> {
        self.runner
            .run_capture(&["git", "rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn checkout(&self, name: &str) -> Result<(), MatrixError> {
        self.runner.run_checked(&["git", "checkout", name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted runner recording every argv it sees.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl ToolRunner for Recorder {
        fn run_status(&self, argv: &[&str]) -> Result<bool, MatrixError> {
            self.calls
                .borrow_mut()
                .push(argv.iter().map(|s| s.to_string()).collect());
            Ok(true)
        }

        fn run_checked(&self, argv: &[&str]) -> Result<(), MatrixError> {
            self.run_status(argv).map(|_| ())
        }

        fn run_capture(&self, argv: &[&str]) -> Result<String, MatrixError> {
            self.run_checked(argv)?;
            Ok("main".to_string())
        }
    }

    #[test]
    fn current_ref_queries_git_with_structured_argv() {
        let runner = Recorder::default();
        let git = GitCli::new(&runner);
        assert_eq!(git.current_ref().unwrap(), "main");
        assert_eq!(
            runner.calls.borrow()[0],
            vec!["git", "rev-parse", "--abbrev-ref", "HEAD"]
        );
    }

    #[test]
    fn checkout_passes_the_name_verbatim() {
        let runner = Recorder::default();
        let git = GitCli::new(&runner);
        git.checkout("res-wide").unwrap();
        assert_eq!(runner.calls.borrow()[0], vec!["git", "checkout", "res-wide"]);
    }
}
