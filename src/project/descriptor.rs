//! Typed project descriptor.

use serde::Serialize;

use crate::template::SiteKind;

/// One desired site, validated at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    /// Unique identifier, used verbatim as the entry filename.
    pub name: String,
    pub domain: String,
    pub subdomain: Option<String>,
    /// Upstream port (1..=65535).
    pub port: u16,
}

impl ProjectDescriptor {
    /// Template kind chosen by the presence of a subdomain.
    pub fn kind(&self) -> SiteKind {
        if self.subdomain.is_some() {
            SiteKind::Subdomain
        } else {
            SiteKind::RootDomain
        }
    }
}

/// Check that a site name is safe to use as a single path component.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}
