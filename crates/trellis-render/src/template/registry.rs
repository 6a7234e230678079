//! Compiled templates and the registry that maps names to them.
//!
//! A [`TemplateRegistry`] is produced whole by a compile pass and never
//! mutated afterwards. Entries are keyed by the base file name of the template
//! a caller asked for (`child.tmpl`), even when the template renders through a
//! layout (`master.tmpl`).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;

/// One executable template: partials, an optional layout and the template's
/// own body, composed into a single environment.
#[derive(Debug)]
pub struct CompiledTemplate {
    /// Layout name when one exists, otherwise the template's own name.
    name: String,
    /// The template's own base name; rendering starts here.
    entry: String,
    layout: Option<String>,
    path: PathBuf,
    env: Environment<'static>,
}

impl CompiledTemplate {
    pub(crate) fn new(
        entry: String,
        layout: Option<String>,
        path: PathBuf,
        env: Environment<'static>,
    ) -> Self {
        let name = layout.clone().unwrap_or_else(|| entry.clone());
        Self {
            name,
            entry,
            layout,
            path,
            env,
        }
    }

    /// The top-level name: the layout's base name if the template extends
    /// one, otherwise the template's own base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template's own base name, which is also its registry key.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    /// Path of the source file this template was compiled from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of every body in the composition (partials, layout, template).
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.env.templates().map(|(name, _)| name).collect();
        names.sort_unstable();
        names
    }

    /// Executes the template with `data`, streaming output into `out`.
    ///
    /// With a layout, the layout renders with this template's blocks
    /// substituted at its insertion points.
    pub fn execute<S, W>(&self, data: &S, out: W) -> Result<(), minijinja::Error>
    where
        S: Serialize + ?Sized,
        W: Write,
    {
        let template = self.env.get_template(&self.entry)?;
        template.render_to_write(data, out)?;
        Ok(())
    }

    /// Executes the template with `data` and returns the output.
    pub fn render<S: Serialize + ?Sized>(&self, data: &S) -> Result<String, minijinja::Error> {
        self.env.get_template(&self.entry)?.render(data)
    }
}

/// Name → compiled template map produced by a compile pass.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, CompiledTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a template by the base file name it was compiled from.
    pub fn lookup(&self, name: &str) -> Option<&CompiledTemplate> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub(crate) fn insert(&mut self, template: CompiledTemplate) {
        self.templates.insert(template.entry.clone(), template);
    }
}
