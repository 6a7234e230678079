//! MiniJinja environment setup and template composition.
//!
//! Every compiled template owns its own [`Environment`]. A [`Composition`]
//! builds that environment one source at a time, in the order partials,
//! layout, child. Adding a source under a name that already exists replaces
//! it, so later sources win.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::options::FuncMap;

/// Creates an environment configured for markup rendering.
///
/// - HTML auto-escaping for every template, whatever its extension
/// - strict undefined handling, so a missing field is an execution error
/// - trailing newlines kept, so output matches the file byte for byte
/// - every entry of `functions` registered as a global
pub fn new_environment(functions: &FuncMap) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_name| AutoEscape::Html);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    for (name, func) in functions.iter() {
        env.add_global(name.to_string(), func.clone());
    }
    env
}

/// Prefixes a child source with the tag binding it to `layout`.
///
/// The tag goes on the child's first line so error line numbers still point
/// at the file on disk.
pub fn bind_to_layout(layout: &str, source: &str) -> String {
    format!(
        "{{% extends \"{}\" %}}{}",
        escape_string_literal(layout),
        source
    )
}

/// Escapes `value` for use inside a double-quoted template string literal.
fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// An environment under construction.
pub struct Composition {
    env: Environment<'static>,
}

impl Composition {
    pub fn new(functions: &FuncMap) -> Self {
        Self {
            env: new_environment(functions),
        }
    }

    /// Parses `source` and registers it under `name`.
    pub fn add(&mut self, name: &str, source: String) -> Result<(), minijinja::Error> {
        self.env.add_template_owned(name.to_string(), source)
    }

    pub fn finish(self) -> Environment<'static> {
        self.env
    }
}
