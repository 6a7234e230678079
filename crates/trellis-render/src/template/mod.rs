//! Template discovery, layout resolution and compilation.
//!
//! Templates are plain MiniJinja files discovered with a glob pattern and
//! addressed by their base file name. A template can place itself inside a
//! layout with a directive comment:
//!
//! ```text
//! {# extends "master.tmpl" #}
//! {% block content %}world!{% endblock %}
//! ```
//!
//! The layout lives in the same directory and marks insertion points with
//! blocks:
//!
//! ```text
//! Hello {% block content %}{% endblock %} from the master template.
//! ```
//!
//! Partials, matched by a second glob, are registered in every composition
//! under their base file name and can be pulled in with `{% include %}` or
//! `{% import %}` from layouts and templates alike.
//!
//! ## Composition Order
//!
//! Each compiled template is built from, in order:
//!
//! 1. the function registry
//! 2. every partial
//! 3. the layout, if the directive names one
//! 4. the template itself
//!
//! A later source with the same name replaces an earlier one.
//!
//! ## Key Types
//!
//! - [`compile`]: one full compile pass
//! - [`TemplateRegistry`]: the name → template map a pass produces
//! - [`CompiledTemplate`]: a composed, executable template
//! - [`find_layout`]: the directive scanner

pub mod compiler;
pub mod engine;
pub mod layout;
pub mod registry;

pub use compiler::{base_name, compile, compile_file, expand_glob, TemplateSource};
pub use layout::{find_layout, parse_directive, scan_source};
pub use registry::{CompiledTemplate, TemplateRegistry};
