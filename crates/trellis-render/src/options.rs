//! Renderer configuration.
//!
//! [`Options`] is built once, handed to [`Renderer::new`](crate::Renderer::new)
//! and never changes afterwards. Every field is optional:
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `templates_glob` | empty | Files compiled into the registry; empty means no templates |
//! | `partials_glob` | none | Fragments made available to every composition |
//! | `functions` | empty | Functions callable from inside templates |
//! | `charset` | `UTF-8` | Appended to every `Content-Type` header |
//! | `debug` | `false` | Recompile the template set before every markup render |
//!
//! Options can also be loaded from YAML, which covers everything except the
//! function registry:
//!
//! ```rust
//! use trellis_render::Options;
//!
//! let options = Options::from_yaml(r#"
//! templates_glob: "views/*.tmpl"
//! partials_glob: "views/partials/*.tmpl"
//! debug: true
//! "#).unwrap();
//!
//! assert_eq!(options.charset(), "UTF-8");
//! assert!(options.debug());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use minijinja::Value;
use serde::Deserialize;
use thiserror::Error;

/// Charset used when none is configured.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Named functions exposed to every compiled template.
///
/// Values are usually built with [`Value::from_function`]:
///
/// ```rust
/// use minijinja::Value;
/// use trellis_render::FuncMap;
///
/// let mut funcs = FuncMap::new();
/// funcs.insert("shout", Value::from_function(|s: String| s.to_uppercase()));
/// assert!(funcs.contains("shout"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<String, Value>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.funcs.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.funcs.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Error loading [`Options`] from YAML.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Configuration for a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    templates_glob: String,
    partials_glob: Option<String>,
    #[serde(skip)]
    functions: FuncMap,
    charset: String,
    debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            templates_glob: String::new(),
            partials_glob: None,
            functions: FuncMap::new(),
            charset: DEFAULT_CHARSET.to_string(),
            debug: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a YAML document.
    ///
    /// An empty `charset` falls back to [`DEFAULT_CHARSET`].
    pub fn from_yaml(yaml: &str) -> Result<Self, OptionsError> {
        let options: Options = serde_yaml::from_str(yaml)?;
        Ok(options.normalized())
    }

    /// Reads and parses a YAML options file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Sets the glob pattern matching the primary templates.
    pub fn with_templates_glob(mut self, pattern: impl Into<String>) -> Self {
        self.templates_glob = pattern.into();
        self
    }

    /// Sets the glob pattern matching partial templates.
    pub fn with_partials_glob(mut self, pattern: impl Into<String>) -> Self {
        self.partials_glob = Some(pattern.into());
        self
    }

    /// Replaces the function registry.
    pub fn with_functions(mut self, functions: FuncMap) -> Self {
        self.functions = functions;
        self
    }

    /// Adds a single function to the registry.
    pub fn with_function(mut self, name: impl Into<String>, value: Value) -> Self {
        self.functions.insert(name, value);
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self.normalized()
    }

    /// Recompile templates before every markup render.
    ///
    /// Meant for local development; production renderers compile once.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn normalized(mut self) -> Self {
        if self.charset.is_empty() {
            self.charset = DEFAULT_CHARSET.to_string();
        }
        self
    }

    pub fn templates_glob(&self) -> Option<&str> {
        if self.templates_glob.is_empty() {
            None
        } else {
            Some(&self.templates_glob)
        }
    }

    pub fn partials_glob(&self) -> Option<&str> {
        self.partials_glob.as_deref().filter(|p| !p.is_empty())
    }

    pub fn functions(&self) -> &FuncMap {
        &self.functions
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}
