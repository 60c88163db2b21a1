//! Approximate package classification.
//!
//! The rule chain mirrors how the catalog sync sorts packages into product types, but it is a
//! heuristic: the counts it produces are not expected to match the internal store exactly.

use crate::domain::model::{CatalogPackage, Category, ClassificationTally};

pub const GLOBAL_LOCATION: &str = "Global";

pub const REGION_LOCATIONS: [&str; 6] = [
    "Europe",
    "Asia",
    "Africa",
    "North America",
    "South America",
    "Oceania",
];

/// Assigns a package to exactly one category. Rules are checked in order and the first match
/// wins, so an unlimited top-up package counts as `Topup` only.
pub fn classify(pkg: &CatalogPackage) -> Category {
    let name = pkg.name().to_lowercase();

    if pkg.support_top_up_type == Some(1) || name.contains("topup") || name.contains("top-up") {
        Category::Topup
    } else if name.contains("unlimited") || pkg.data_type == Some(2) {
        Category::Unlimited
    } else if pkg.location_code() == GLOBAL_LOCATION {
        Category::Global
    } else if REGION_LOCATIONS.contains(&pkg.location_code()) {
        Category::Region
    } else {
        Category::Local
    }
}

pub fn tally(packages: &[CatalogPackage]) -> ClassificationTally {
    let mut tally = ClassificationTally::default();
    for pkg in packages {
        let category = classify(pkg);
        tracing::debug!(
            "{} -> {}",
            pkg.package_code.as_deref().unwrap_or(pkg.name()),
            category
        );
        tally.record(category);
    }
    tally
}
