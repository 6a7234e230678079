//! The compile pass: glob, scan, compose, collect.
//!
//! [`compile`] turns [`Options`] into a fresh [`TemplateRegistry`]. For each
//! file matched by the templates glob it:
//!
//! 1. takes the file's base name as the registry key
//! 2. scans the file for a layout directive
//! 3. composes partials, then the layout, then the file itself
//! 4. stores the result under the key from step 1
//!
//! The pass is all or nothing. The first unreadable file, bad pattern or
//! syntax error aborts it and no registry is returned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, trace};

use super::engine::{bind_to_layout, Composition};
use super::layout::scan_source;
use super::registry::{CompiledTemplate, TemplateRegistry};
use crate::error::CompileError;
use crate::options::Options;

/// A template source read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Base file name, e.g. `"child.tmpl"`.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl TemplateSource {
    /// Reads the file at `path`.
    pub fn read(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            name: base_name(path),
            path: path.to_path_buf(),
            content,
        })
    }
}

/// Returns the final component of `path` as a string.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Expands `pattern` into the regular files it matches, in glob order.
///
/// Directories matching the pattern are skipped.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, CompileError> {
    let paths = glob::glob(pattern).map_err(|source| CompileError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|source| CompileError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Compiles every template matched by the options into a new registry.
///
/// Without a templates glob the registry is empty.
///
/// # Errors
///
/// Any [`CompileError`] aborts the whole pass.
pub fn compile(options: &Options) -> Result<TemplateRegistry, CompileError> {
    let mut registry = TemplateRegistry::new();
    let Some(pattern) = options.templates_glob() else {
        return Ok(registry);
    };

    let started = Instant::now();
    let partials = match options.partials_glob() {
        Some(partials_pattern) => expand_glob(partials_pattern)?
            .iter()
            .map(|path| TemplateSource::read(path))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for path in expand_glob(pattern)? {
        let name = base_name(&path);
        if let Some(existing) = seen.get(&name) {
            return Err(CompileError::Collision {
                name,
                existing_path: existing.clone(),
                conflicting_path: path,
            });
        }

        let template = compile_file(&path, &partials, options)?;
        trace!(
            template = %template.entry(),
            layout = template.layout().unwrap_or("-"),
            "compiled template"
        );
        seen.insert(name, path);
        registry.insert(template);
    }

    debug!(
        pattern,
        partials = partials.len(),
        templates = registry.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "compiled template set"
    );
    Ok(registry)
}

/// Compiles a single template file with the given partials.
pub fn compile_file(
    path: &Path,
    partials: &[TemplateSource],
    options: &Options,
) -> Result<CompiledTemplate, CompileError> {
    let child = TemplateSource::read(path)?;
    let layout = scan_source(&child.content).map(str::to_string);

    let mut comp = Composition::new(options.functions());
    for partial in partials {
        add_source(&mut comp, &partial.name, partial.content.clone(), &partial.path)?;
    }

    let layout_name = match layout {
        Some(reference) => {
            let layout_path = path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(&reference);
            let layout = TemplateSource::read(&layout_path)?;
            if layout.name == child.name {
                return Err(CompileError::SelfExtends {
                    path: path.to_path_buf(),
                });
            }
            add_source(&mut comp, &layout.name, layout.content, &layout.path)?;
            Some(layout.name)
        }
        None => None,
    };

    let body = match &layout_name {
        Some(layout) => bind_to_layout(layout, &child.content),
        None => child.content,
    };
    add_source(&mut comp, &child.name, body, path)?;

    Ok(CompiledTemplate::new(
        child.name,
        layout_name,
        path.to_path_buf(),
        comp.finish(),
    ))
}

fn add_source(
    comp: &mut Composition,
    name: &str,
    source: String,
    path: &Path,
) -> Result<(), CompileError> {
    comp.add(name, source).map_err(|source| CompileError::Parse {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::{context, Value};
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn glob_in(dir: &Path, pattern: &str) -> String {
        dir.join(pattern).to_string_lossy().into_owned()
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("views/child.tmpl")), "child.tmpl");
        assert_eq!(base_name(Path::new("child.tmpl")), "child.tmpl");
    }

    #[test]
    fn test_empty_glob_compiles_nothing() {
        let registry = compile(&Options::new()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_every_match_is_registered_by_base_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.tmpl", "A");
        write(dir.path(), "b.tmpl", "B");
        write(dir.path(), "notes.txt", "not a template");

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        let registry = compile(&options).unwrap();

        assert_eq!(registry.names(), vec!["a.tmpl", "b.tmpl"]);
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "page.tmpl", "page");
        std::fs::create_dir(dir.path().join("folder.tmpl")).unwrap();

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        let registry = compile(&options).unwrap();

        assert_eq!(registry.names(), vec!["page.tmpl"]);
    }

    #[test]
    fn test_layout_composition() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "master.tmpl",
            "<body>{% block content %}{% endblock %}</body>\n",
        );
        write(
            dir.path(),
            "child.tmpl",
            "{# extends \"master.tmpl\" #}\n{% block content %}{{ who }}{% endblock %}\n",
        );

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        let registry = compile(&options).unwrap();

        let child = registry.lookup("child.tmpl").unwrap();
        assert_eq!(child.name(), "master.tmpl");
        assert_eq!(child.layout(), Some("master.tmpl"));
        assert_eq!(child.template_names(), vec!["child.tmpl", "master.tmpl"]);
        assert_eq!(
            child.render(&context! { who => "kid" }).unwrap(),
            "<body>kid</body>\n"
        );

        // The layout is a template source of its own, too.
        let master = registry.lookup("master.tmpl").unwrap();
        assert_eq!(master.name(), "master.tmpl");
        assert_eq!(master.layout(), None);
    }

    #[test]
    fn test_partials_are_available_to_layout_and_child() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "partials/sig.tmpl", "-- the team");
        write(
            dir.path(),
            "views/base.tmpl",
            "{% block content %}{% endblock %} {% include \"sig.tmpl\" %}",
        );
        write(
            dir.path(),
            "views/note.tmpl",
            "{# extends \"base.tmpl\" #}{% block content %}Thanks{% endblock %}",
        );

        let options = Options::new()
            .with_templates_glob(glob_in(dir.path(), "views/*.tmpl"))
            .with_partials_glob(glob_in(dir.path(), "partials/*.tmpl"));
        let registry = compile(&options).unwrap();

        let note = registry.lookup("note.tmpl").unwrap();
        assert_eq!(
            note.template_names(),
            vec!["base.tmpl", "note.tmpl", "sig.tmpl"]
        );
        assert_eq!(note.render(&context! {}).unwrap(), "Thanks -- the team");
    }

    #[test]
    fn test_child_overrides_partial_with_same_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "partials/page.tmpl", "from partial");
        write(dir.path(), "views/page.tmpl", "from page");

        let options = Options::new()
            .with_templates_glob(glob_in(dir.path(), "views/*.tmpl"))
            .with_partials_glob(glob_in(dir.path(), "partials/*.tmpl"));
        let registry = compile(&options).unwrap();

        let page = registry.lookup("page.tmpl").unwrap();
        assert_eq!(page.render(&context! {}).unwrap(), "from page");
    }

    #[test]
    fn test_functions_are_registered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "f.tmpl", "{{ double(21) }}");

        let options = Options::new()
            .with_templates_glob(glob_in(dir.path(), "*.tmpl"))
            .with_function("double", Value::from_function(|n: i64| n * 2));
        let registry = compile(&options).unwrap();

        let output = registry.lookup("f.tmpl").unwrap().render(&context! {}).unwrap();
        assert_eq!(output, "42");
    }

    #[test]
    fn test_missing_layout_aborts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "orphan.tmpl", "{# extends \"gone.tmpl\" #}");

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        let result = compile(&options);

        match result {
            Err(CompileError::Read { path, .. }) => assert!(path.ends_with("gone.tmpl")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_extends_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "loop.tmpl", "{# extends \"loop.tmpl\" #}");

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        assert!(matches!(
            compile(&options),
            Err(CompileError::SelfExtends { .. })
        ));
    }

    #[test]
    fn test_syntax_error_aborts_pass() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.tmpl", "fine");
        write(dir.path(), "bad.tmpl", "{% if %}");

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*.tmpl"));
        match compile(&options) {
            Err(CompileError::Parse { name, .. }) => assert_eq!(name, "bad.tmpl"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_partial_aborts_pass() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "partials/broken.tmpl", "{{ unclosed");
        write(dir.path(), "views/page.tmpl", "page");

        let options = Options::new()
            .with_templates_glob(glob_in(dir.path(), "views/*.tmpl"))
            .with_partials_glob(glob_in(dir.path(), "partials/*.tmpl"));
        assert!(matches!(compile(&options), Err(CompileError::Parse { .. })));
    }

    #[test]
    fn test_invalid_pattern() {
        let options = Options::new().with_templates_glob("views/[*.tmpl");
        assert!(matches!(
            compile(&options),
            Err(CompileError::Pattern { .. })
        ));
    }

    #[test]
    fn test_same_base_name_in_two_directories_collides() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/index.tmpl", "A");
        write(dir.path(), "b/index.tmpl", "B");

        let options = Options::new().with_templates_glob(glob_in(dir.path(), "*/index.tmpl"));
        match compile(&options) {
            Err(CompileError::Collision { name, .. }) => assert_eq!(name, "index.tmpl"),
            other => panic!("expected collision, got {:?}", other),
        }
    }
}
