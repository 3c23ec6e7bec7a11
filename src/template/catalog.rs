//! Template catalog keyed by site kind.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::project::ProjectDescriptor;
use crate::template::render::render_str;
use crate::template::TemplateError;

/// Whether a site is served on the bare domain or on a subdomain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    RootDomain,
    Subdomain,
}

impl SiteKind {
    /// Key used in the template set file.
    pub fn key(self) -> &'static str {
        match self {
            SiteKind::RootDomain => "rootdomain",
            SiteKind::Subdomain => "subdomain",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "rootdomain" => Some(SiteKind::RootDomain),
            "subdomain" => Some(SiteKind::Subdomain),
            _ => None,
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    #[serde(default)]
    template: Option<String>,
}

/// Read-only set of template bodies, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<SiteKind, String>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for tests and embedding.
    pub fn with_template(mut self, kind: SiteKind, body: impl Into<String>) -> Self {
        self.templates.insert(kind, body.into());
        self
    }

    /// Parse the `{"rootdomain": {"template": ...}, ...}` document.
    ///
    /// Unknown keys are ignored with a warning. Entries without a usable
    /// body are left out so lookups for that kind fail per project.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Value> = serde_json::from_str(content)?;
        let mut catalog = Self::new();

        for (key, value) in raw {
            let Some(kind) = SiteKind::from_key(&key) else {
                tracing::warn!(key = %key, "Ignoring unknown template kind");
                continue;
            };
            let entry: TemplateEntry = serde_json::from_value(value)?;
            match entry.template {
                Some(body) if !body.is_empty() => {
                    catalog.templates.insert(kind, body);
                }
                _ => tracing::warn!(kind = %kind, "Template entry has no body"),
            }
        }

        Ok(catalog)
    }

    pub fn get(&self, kind: SiteKind) -> Option<&str> {
        self.templates.get(&kind).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render the template for `kind` with the project's parameters.
    pub fn render(
        &self,
        kind: SiteKind,
        project: &ProjectDescriptor,
    ) -> Result<String, TemplateError> {
        let body = self.get(kind).ok_or(TemplateError::NotFound(kind))?;

        let values = HashMap::from([
            ("subdomain", project.subdomain.clone().unwrap_or_default()),
            ("domain", project.domain.clone()),
            ("port", project.port.to_string()),
        ]);
        render_str(body, &values)
    }

    /// Render using the kind implied by the project.
    pub fn render_project(&self, project: &ProjectDescriptor) -> Result<String, TemplateError> {
        self.render(project.kind(), project)
    }
}
