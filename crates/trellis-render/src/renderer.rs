//! The render dispatcher.
//!
//! [`Renderer`] owns the compiled template set and writes responses in every
//! supported format. Handlers share one renderer, typically as an
//! `Arc<Renderer>` in application state:
//!
//! ```rust,ignore
//! let renderer = Renderer::new(Options::new().with_templates_glob("views/*.tmpl"))?;
//!
//! renderer.html(&mut response, 200, "index.tmpl", &page)?;
//! renderer.json(&mut response, 200, Some(&payload))?;
//! ```
//!
//! # Markup Output
//!
//! [`Renderer::html`] executes into a pooled buffer first. Headers, status
//! and body are only written once execution succeeded, so a failing template
//! leaves the response untouched and the handler can still send an error page.
//!
//! # Structured Output
//!
//! [`json`](Renderer::json), [`xml`](Renderer::xml) and [`yaml`](Renderer::yaml)
//! write the header and status first, then stream the encoded payload. An
//! encoding failure can therefore leave a truncated body. Passing `None` sends
//! the header and status with an empty body.
//!
//! # Debug Mode
//!
//! With [`Options::with_debug`] enabled, the template set is recompiled before
//! every markup render so edits on disk show up without a restart. A failed
//! recompile is reported to the caller and the previous template set stays in
//! use.

use std::io::Write;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::buffer::BufferPool;
use crate::error::{CompileError, RenderError};
use crate::options::Options;
use crate::response::{
    content_type, ResponseWriter, CONTENT_HTML, CONTENT_JSON, CONTENT_TEXT, CONTENT_TYPE,
    CONTENT_XML, CONTENT_YAML,
};
use crate::serialize::{write_json, write_xml, write_yaml};
use crate::template::{compile, TemplateRegistry};

/// Compiles templates and renders responses.
///
/// The published template set is an immutable snapshot. A recompile builds a
/// complete new registry and then swaps it in, so a render never sees a
/// partially built set.
#[derive(Debug)]
pub struct Renderer {
    options: Options,
    registry: RwLock<Arc<TemplateRegistry>>,
    buffers: BufferPool,
}

impl Renderer {
    /// Creates a renderer and compiles the template set.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] of the initial compile pass.
    pub fn new(options: Options) -> Result<Self, CompileError> {
        let registry = compile(&options)?;
        Ok(Self {
            options,
            registry: RwLock::new(Arc::new(registry)),
            buffers: BufferPool::default(),
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Charset appended to every `Content-Type` header.
    pub fn charset(&self) -> &str {
        self.options.charset()
    }

    /// The currently published template set.
    pub fn registry(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&self.registry.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Runs a full compile pass and publishes the result.
    ///
    /// On failure the previously published set is kept.
    pub fn recompile(&self) -> Result<(), CompileError> {
        let fresh = Arc::new(compile(&self.options)?);
        *self.registry.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(())
    }

    /// Renders the template `name` with `data` as an HTML response.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Compile`] if a debug-mode recompile fails
    /// - [`RenderError::TemplateNotFound`] if no template has that name
    /// - [`RenderError::Template`] if execution fails
    ///
    /// In all three cases nothing has been written to `w`.
    pub fn html<W, S>(
        &self,
        w: &mut W,
        status: u16,
        name: &str,
        data: &S,
    ) -> Result<(), RenderError>
    where
        W: ResponseWriter + ?Sized,
        S: Serialize + ?Sized,
    {
        let registry = self.current_registry()?;
        let template = registry
            .lookup(name)
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))?;

        let mut buf = self.buffers.get();
        template.execute(data, &mut *buf)?;

        w.set_header(CONTENT_TYPE, &content_type(CONTENT_HTML, self.charset()));
        w.write_status(status);
        w.write_all(&buf)?;
        Ok(())
    }

    /// Renders the template `name` with `data` and returns the output.
    pub fn render_to_string<S>(&self, name: &str, data: &S) -> Result<String, RenderError>
    where
        S: Serialize + ?Sized,
    {
        let registry = self.current_registry()?;
        let template = registry
            .lookup(name)
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))?;
        Ok(template.render(data)?)
    }

    /// Writes `data` as compact JSON followed by a newline.
    pub fn json<W, T>(&self, w: &mut W, status: u16, data: Option<&T>) -> Result<(), RenderError>
    where
        W: ResponseWriter + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_head(w, CONTENT_JSON, status);
        match data {
            Some(data) => write_json(w, data),
            None => Ok(()),
        }
    }

    /// Writes `data` as XML, rooted at the type name of a named struct.
    pub fn xml<W, T>(&self, w: &mut W, status: u16, data: Option<&T>) -> Result<(), RenderError>
    where
        W: ResponseWriter + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_head(w, CONTENT_XML, status);
        match data {
            Some(data) => write_xml(w, data),
            None => Ok(()),
        }
    }

    /// Writes `data` as YAML.
    pub fn yaml<W, T>(&self, w: &mut W, status: u16, data: Option<&T>) -> Result<(), RenderError>
    where
        W: ResponseWriter + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_head(w, CONTENT_YAML, status);
        match data {
            Some(data) => write_yaml(w, data),
            None => Ok(()),
        }
    }

    /// Writes `text` verbatim as a plain text response.
    ///
    /// The only possible error is the sink failing to accept the body.
    pub fn text<W>(&self, w: &mut W, status: u16, text: &str) -> Result<(), RenderError>
    where
        W: ResponseWriter + ?Sized,
    {
        self.write_head(w, CONTENT_TEXT, status);
        w.write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_head<W: ResponseWriter + ?Sized>(&self, w: &mut W, mime: &str, status: u16) {
        w.set_header(CONTENT_TYPE, &content_type(mime, self.charset()));
        w.write_status(status);
    }

    /// Returns the registry to render from, recompiling first in debug mode.
    fn current_registry(&self) -> Result<Arc<TemplateRegistry>, RenderError> {
        if self.options.debug() {
            self.recompile()?;
        }
        Ok(self.registry())
    }
}
