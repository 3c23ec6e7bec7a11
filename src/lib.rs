//! Virtual-host configuration sync for nginx-style web servers.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod project;
pub mod server;
pub mod sites;
pub mod store;
pub mod sync;
pub mod template;

pub use config::SyncConfig;
pub use project::ProjectDescriptor;
pub use server::{CommandController, ServerController};
pub use store::ConfigStore;
pub use sync::{SyncEngine, SyncReport};
pub use template::TemplateCatalog;
