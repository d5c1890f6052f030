//! Error taxonomy for the orchestrator.
//!
//! Policy: fail fast on configuration and tooling errors (unknown entry,
//! unresolvable template, checkout/build failure, driver that cannot be
//! launched); tolerate individual benchmark runs that start but exit
//! non-zero. Unknown group selections are not errors at all — they simply
//! contribute no binaries.

/// Top-level orchestrator error.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// A requested catalog entry does not exist in the registry.
    #[error("unknown test entry: {0}")]
    UnknownEntry(String),

    /// An argument-template placeholder is unbound or malformed.
    #[error("unresolvable placeholder `{placeholder}` in template `{template}`")]
    Template {
        placeholder: String,
        template: String,
    },

    /// A required parameter is missing or has the wrong shape.
    #[error("entry `{entry}`: parameter `{name}` is missing or not numeric")]
    Param { entry: String, name: String },

    /// An external tool (checkout, build) ran but reported failure.
    #[error("external tool failed ({status}): {command}")]
    ExternalTool { command: String, status: String },

    /// A child process could not be started at all.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
