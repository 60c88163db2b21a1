pub mod audit;
pub mod classifier;
pub mod internal_counts;
pub mod link_verifier;
pub mod reconcile;
pub mod report;

pub use crate::domain::model::{CatalogPackage, Category, ClassificationTally, Verdict};
pub use crate::domain::ports::{CommandRunner, PackageSource};
pub use crate::utils::error::Result;
