//! Prompt template store.
//!
//! DESIGN
//! ======
//! Templates live in `<dir>/<name>.yml` under the nested key
//! `summary.prompt.template`. A loaded template is memoized by name for the
//! process lifetime with no reload; failures are never cached.
//!
//! Placeholders use `{name}` syntax with `{{` / `}}` as literal braces. Every
//! placeholder must be supplied and every supplied key must be used.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_yaml::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to load prompt file {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
    #[error("invalid prompt format in {}: missing summary.prompt.template", .0.display())]
    InvalidFormat(PathBuf),
    #[error("prompt formatting failed: {0}")]
    Format(String),
}

impl crate::error::ErrorCode for PromptError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PROMPT_NOT_FOUND",
            Self::Load { .. } => "E_PROMPT_LOAD",
            Self::InvalidFormat(_) => "E_PROMPT_INVALID_FORMAT",
            Self::Format(_) => "E_PROMPT_FORMAT",
        }
    }
}

pub struct PromptStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl PromptStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), cache: RwLock::new(HashMap::new()) }
    }

    /// Return the raw template for `name`, reading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::NotFound`] when the file is missing,
    /// [`PromptError::Load`] when it cannot be read or parsed as YAML, and
    /// [`PromptError::InvalidFormat`] when the template field is absent or empty.
    pub fn load(&self, name: &str) -> Result<Arc<str>, PromptError> {
        if let Some(template) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(template));
        }

        let path = self.dir.join(format!("{name}.yml"));
        let template: Arc<str> = read_template(&path)?.into();
        debug!(prompt = name, path = %path.display(), "prompt: template loaded");

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Load `name` and substitute `vars` into its placeholders.
    ///
    /// # Errors
    ///
    /// Returns any [`PromptStore::load`] error, or [`PromptError::Format`] on
    /// an unresolved placeholder, an unused variable, or a stray brace.
    pub fn format(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, PromptError> {
        let template = self.load(name)?;
        render(&template, vars)
    }
}

fn read_template(path: &Path) -> Result<String, PromptError> {
    if !path.is_file() {
        return Err(PromptError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| PromptError::Load { path: path.to_path_buf(), reason: e.to_string() })?;
    let doc: Value =
        serde_yaml::from_str(&raw).map_err(|e| PromptError::Load { path: path.to_path_buf(), reason: e.to_string() })?;

    doc.get("summary")
        .and_then(|v| v.get("prompt"))
        .and_then(|v| v.get("template"))
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| PromptError::InvalidFormat(path.to_path_buf()))
}

/// Substitute `{name}` placeholders in `template`.
pub(crate) fn render(template: &str, vars: &[(&str, &str)]) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut used: HashSet<&str> = HashSet::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, n)| n == '{').is_some() => out.push('{'),
            '}' if chars.next_if(|&(_, n)| n == '}').is_some() => out.push('}'),
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(PromptError::Format(format!("unclosed '{{' at byte {pos}")));
                }
                let Some((key, value)) = vars.iter().find(|(k, _)| *k == name) else {
                    return Err(PromptError::Format(format!("missing value for placeholder '{{{name}}}'")));
                };
                used.insert(*key);
                out.push_str(value);
            }
            '}' => return Err(PromptError::Format(format!("single '}}' at byte {pos}"))),
            other => out.push(other),
        }
    }

    if let Some((unused, _)) = vars.iter().find(|(k, _)| !used.contains(k)) {
        return Err(PromptError::Format(format!("unused substitution key '{unused}'")));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
