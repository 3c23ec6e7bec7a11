//! Site templates.
//!
//! # Responsibilities
//! - Hold one template body per site kind
//! - Pick the kind from the project (subdomain present or not)
//! - Substitute `subdomain`, `domain` and `port`

pub mod catalog;
pub mod render;

pub use catalog::{SiteKind, TemplateCatalog};

/// Template lookup or rendering failure for a single project.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("no template for site kind '{0}'")]
    NotFound(SiteKind),

    #[error("unresolvable placeholder '{0}'")]
    Render(String),
}
