pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CommonArgs;

pub use crate::adapters::{InventoryClient, SshCommandRunner};
pub use crate::config::AuditConfig;
pub use crate::core::{
    audit::AuditEngine, internal_counts::InternalCountRetriever, link_verifier::LinkVerifier,
};
pub use crate::utils::error::{AuditError, Result};
