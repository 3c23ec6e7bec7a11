//! Site listing.

use std::fmt::Write;

use crate::store::{ConfigStore, SiteListing, StoreError};

/// Render a listing as human-readable text.
///
/// With `with_content`, each available entry and each live enabled entry is
/// followed by its body; a read failure for one entry is shown in place of
/// its body.
pub fn format_listing(
    store: &ConfigStore,
    listing: &SiteListing,
    with_content: bool,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Available configurations ({}):",
        store.available_dir().display()
    );
    if listing.available.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in &listing.available {
        let _ = writeln!(out, "- {}", entry.name);
        if with_content {
            write_body(&mut out, store.read_available(&entry.name));
        }
    }

    let _ = writeln!(out, "\nEnabled configurations ({}):", store.enabled_dir().display());
    if listing.enabled.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in &listing.enabled {
        match (&entry.target, entry.dangling) {
            (Some(target), true) => {
                let _ = writeln!(out, "- {} -> {} (dangling)", entry.name, target.display());
            }
            (Some(target), false) => {
                let _ = writeln!(out, "- {} -> {}", entry.name, target.display());
            }
            (None, _) => {
                let _ = writeln!(out, "- {} (not a link)", entry.name);
            }
        }
        if with_content && !entry.dangling {
            write_body(&mut out, store.read_enabled(&entry.name));
        }
    }

    out
}

fn write_body(out: &mut String, body: Result<String, StoreError>) {
    match body {
        Ok(body) => {
            for line in body.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        Err(e) => {
            let _ = writeln!(out, "    <error: {e}>");
        }
    }
}

/// Snapshot and format in one step.
pub fn list_sites(store: &ConfigStore, with_content: bool) -> Result<String, StoreError> {
    let listing = store.list()?;
    Ok(format_listing(store, &listing, with_content))
}
