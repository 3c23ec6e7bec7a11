//! Listing and deletion utilities.
//!
//! Plain file operations over the `ConfigStore`; deletion shares the
//! validate-then-reload step with sync.

pub mod delete;
pub mod list;

pub use delete::{delete_sites, remove_site, DeleteReport, Removal};
pub use list::{format_listing, list_sites};
