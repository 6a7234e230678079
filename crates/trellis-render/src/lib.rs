//! # Trellis Render - Layout-Aware Templates for HTTP Responses
//!
//! `trellis-render` compiles a directory of MiniJinja templates, resolves the
//! layouts they declare, and renders HTTP responses as markup, JSON, XML,
//! YAML or plain text.
//!
//! ## Core Concepts
//!
//! - [`Options`]: where templates live, shared functions, charset, debug mode
//! - [`Renderer`]: compiles the template set and dispatches responses
//! - [`ResponseWriter`]: the sink a response is written into
//! - Layout directive: `{# extends "master.tmpl" #}` on any line of a template
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trellis_render::{Options, Renderer, ResponseRecorder};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Page {
//!     name: String,
//! }
//!
//! let renderer = Renderer::new(
//!     Options::new()
//!         .with_templates_glob("views/*.tmpl")
//!         .with_partials_glob("views/partials/*.tmpl"),
//! )?;
//!
//! let mut response = ResponseRecorder::new();
//! renderer.html(&mut response, 200, "hello.tmpl", &Page { name: "world".into() })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layouts
//!
//! A template opts into a layout with a directive comment naming a file in
//! its own directory:
//!
//! ```text
//! {# extends "master.tmpl" #}
//! {% block content %}world!{% endblock %}
//! ```
//!
//! The layout declares the blocks a template fills in:
//!
//! ```text
//! Hello {% block content %}{% endblock %} from the master template.
//! ```
//!
//! Templates are always looked up by their own base file name, here
//! `child.tmpl`, never by the layout's. See [`template`] for the full
//! composition rules.
//!
//! ## Structured Output
//!
//! ```rust
//! use trellis_render::{Options, Renderer, ResponseRecorder};
//! use serde_json::json;
//!
//! let renderer = Renderer::new(Options::new())?;
//! let mut response = ResponseRecorder::new();
//! renderer.json(&mut response, 200, Some(&json!({"ok": true})))?;
//!
//! assert_eq!(response.header("Content-Type"), Some("application/json; charset=UTF-8"));
//! assert_eq!(response.body_string(), "{\"ok\":true}\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration
//!
//! Options can be built in code or loaded from YAML with
//! [`Options::from_file`]. Functions are always registered in code.

mod buffer;
mod error;
pub mod options;
mod renderer;
pub mod response;
pub mod serialize;
pub mod template;

pub use buffer::{BufferPool, PooledBuffer, DEFAULT_POOL_SIZE, MAX_POOLED_CAPACITY};
pub use error::{CompileError, RenderError};
pub use options::{FuncMap, Options, OptionsError, DEFAULT_CHARSET};
pub use renderer::Renderer;
pub use response::{
    content_type, ResponseRecorder, ResponseWriter, CONTENT_HTML, CONTENT_JSON, CONTENT_TEXT,
    CONTENT_TYPE, CONTENT_XML, CONTENT_YAML,
};
pub use template::{CompiledTemplate, TemplateRegistry};

// For building function values and render contexts.
pub use minijinja;
