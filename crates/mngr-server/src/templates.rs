//! HTML template rendering.
//!
//! Handlers render through the [`RenderEngine`] trait and address templates by
//! name (`list.html`, `view.html`, `edit.html`, `new.html`). [`TemplateEngine`]
//! is the minijinja-backed implementation with built-in templates that can be
//! replaced file by file from a template directory.

use std::path::{Path, PathBuf};

use minijinja::Environment;

/// Built-in templates, compiled into the binary.
const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("view.html", include_str!("../templates/view.html")),
    ("edit.html", include_str!("../templates/edit.html")),
    ("new.html", include_str!("../templates/new.html")),
];

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template is missing, fails to compile or fails to render.
    #[error("template {name}: {source}")]
    Template {
        /// Template name.
        name: String,
        /// Underlying minijinja error.
        #[source]
        source: minijinja::Error,
    },
    /// Template directory could not be read.
    #[error("reading templates from {}: {source}", .path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// View data could not be serialized.
    #[error("template data: {0}")]
    Data(#[from] serde_json::Error),
}

impl RenderError {
    fn template(name: &str, source: minijinja::Error) -> Self {
        Self::Template {
            name: name.to_owned(),
            source,
        }
    }
}

/// Named-template rendering engine shared by all requests.
pub trait RenderEngine: Send + Sync {
    /// Render template `name` with `data` as its context.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template is unknown or rendering fails.
    fn execute_template(&self, name: &str, data: &serde_json::Value)
    -> Result<String, RenderError>;
}

/// minijinja-backed [`RenderEngine`].
///
/// Templates ending in `.html` are auto-escaped.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine with the built-in templates.
    ///
    /// When `override_dir` is given, every `*.html` file in it replaces the
    /// built-in template of the same name (or adds a new one). Overrides are
    /// read once here; later changes on disk are not picked up.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the directory can't be read or a template
    /// fails to compile.
    pub fn new(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| RenderError::template(name, e))?;
        }

        if let Some(dir) = override_dir {
            let count = load_overrides(&mut env, dir)?;
            tracing::info!(dir = %dir.display(), count, "Loaded template overrides");
        }

        Ok(Self { env })
    }
}

impl RenderEngine for TemplateEngine {
    fn execute_template(
        &self,
        name: &str,
        data: &serde_json::Value,
    ) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| RenderError::template(name, e))?;
        template
            .render(data)
            .map_err(|e| RenderError::template(name, e))
    }
}

/// Add every `*.html` file in `dir` to `env`, returning how many were loaded.
fn load_overrides(env: &mut Environment<'static>, dir: &Path) -> Result<usize, RenderError> {
    let io_error = |path: &Path, source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut count = 0;
    for entry in std::fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        env.add_template_owned(name.clone(), source)
            .map_err(|e| RenderError::template(&name, e))?;
        count += 1;
    }
    Ok(count)
}

/// Engine that records every call instead of rendering, for handler tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingEngine {
    calls: std::sync::Mutex<Vec<(String, serde_json::Value)>>,
}

#[cfg(test)]
impl RecordingEngine {
    /// Recorded `(template, data)` pairs in call order.
    pub(crate) fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl RenderEngine for RecordingEngine {
    fn execute_template(
        &self,
        name: &str,
        data: &serde_json::Value,
    ) -> Result<String, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_owned(), data.clone()));
        Ok(format!("rendered {name}"))
    }
}
