//! Error types for template compilation and response rendering.
//!
//! Two error types split the lifecycle in half:
//!
//! - [`CompileError`] covers a compile pass: glob expansion, reading template
//!   files, parsing template syntax. Any of these aborts the whole pass and the
//!   previously published registry stays in place.
//! - [`RenderError`] covers a single render call: unknown template names,
//!   execution failures, encoding failures and sink I/O. These are returned to
//!   the calling handler so it can choose a fallback response.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while compiling the template set.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The configured glob pattern is malformed.
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A path matched by the glob could not be inspected.
    #[error("failed to read glob match for \"{pattern}\": {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    /// A template file could not be opened or read.
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template syntax error.
    #[error("failed to parse template \"{name}\" ({}): {source}", path.display())]
    Parse {
        name: String,
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// A template names itself as its layout.
    #[error("template {} extends itself", path.display())]
    SelfExtends { path: PathBuf },

    /// Two matched files share a base name, so both would claim one registry key.
    #[error(
        "template collision detected for \"{name}\":\n  - {}\n  - {}",
        existing_path.display(),
        conflicting_path.display()
    )]
    Collision {
        name: String,
        existing_path: PathBuf,
        conflicting_path: PathBuf,
    },
}

/// Error returned by the render dispatchers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No compiled template is registered under the requested name.
    #[error("unrecognised template {0}")]
    TemplateNotFound(String),

    /// A debug-mode recompile failed before the render could run.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The template failed while executing against the supplied data.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing to the response sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
