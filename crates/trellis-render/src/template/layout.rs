//! Detection of the layout directive.
//!
//! A template names its layout with a comment anywhere in the file:
//!
//! ```text
//! {# extends "master.tmpl" #}
//! ```
//!
//! Being a comment, the directive renders to nothing. The quoted name is a
//! file in the same directory as the template declaring it. Every line is
//! checked and the first match wins.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CompileError;

static EXTENDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{#-?\s*extends\s+"([^"]+)"\s*-?#\}"#).unwrap());

/// Extracts the layout name from a single line, if it carries the directive.
///
/// ```rust
/// use trellis_render::template::parse_directive;
///
/// assert_eq!(parse_directive(r#"{# extends "master.tmpl" #}"#), Some("master.tmpl"));
/// assert_eq!(parse_directive("{# just a comment #}"), None);
/// ```
pub fn parse_directive(line: &str) -> Option<&str> {
    EXTENDS_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scans template source already in memory for a layout directive.
///
/// Lines are checked in order and the first directive wins.
pub fn scan_source(source: &str) -> Option<&str> {
    source.lines().find_map(parse_directive)
}

/// Scans the template at `path` for a layout directive.
///
/// # Errors
///
/// Returns [`CompileError::Read`] if the file cannot be opened or read.
pub fn find_layout(path: &Path) -> Result<Option<String>, CompileError> {
    let read_error = |source| CompileError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(read_error)?;
        if let Some(layout) = parse_directive(&line) {
            return Ok(Some(layout.to_string()));
        }
    }

    Ok(None)
}
