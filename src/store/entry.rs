//! On-disk presence of site entries.

use std::path::PathBuf;

use serde::Serialize;

/// The two independent facets of one site's presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfigEntry {
    /// A body exists in the available directory.
    pub defined: bool,
    /// An activation link exists in the enabled directory.
    pub enabled: bool,
}

impl ConfigEntry {
    /// Either facet present; creation must not touch this site.
    pub fn is_present(&self) -> bool {
        self.defined || self.enabled
    }

    /// Activation without a definition.
    pub fn is_dangling(&self) -> bool {
        self.enabled && !self.defined
    }
}

/// A defined site entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableEntry {
    pub name: String,
    pub path: PathBuf,
}

/// An entry in the enabled directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledEntry {
    pub name: String,
    /// Link target, `None` when the entry is a regular file.
    pub target: Option<PathBuf>,
    /// Link whose target does not exist.
    pub dangling: bool,
}

/// Snapshot of both directories, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteListing {
    pub available: Vec<AvailableEntry>,
    pub enabled: Vec<EnabledEntry>,
}
