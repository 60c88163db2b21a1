use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the remote inventory's package list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPackage {
    #[serde(default)]
    pub package_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub data_type: Option<i64>,
    #[serde(default)]
    pub location_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub support_top_up_type: Option<i64>,
}

/// Integer codes are only compared, so a value of any other JSON type reads as absent instead of
/// failing the whole package list. Whole floats such as `2.0` count as integers.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }))
}

impl CatalogPackage {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn location_code(&self) -> &str {
        self.location_code.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Topup,
    Unlimited,
    Global,
    Region,
    Local,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 5] = [
        Category::Unlimited,
        Category::Local,
        Category::Global,
        Category::Region,
        Category::Topup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Topup => "topup",
            Category::Unlimited => "unlimited",
            Category::Global => "global",
            Category::Region => "region",
            Category::Local => "local",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category package counts. Every counted package lands in exactly one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationTally {
    pub unlimited: u64,
    pub local: u64,
    pub global: u64,
    pub region: u64,
    pub topup: u64,
}

impl ClassificationTally {
    pub fn record(&mut self, category: Category) {
        *self.slot(category) += 1;
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Topup => self.topup,
            Category::Unlimited => self.unlimited,
            Category::Global => self.global,
            Category::Region => self.region,
            Category::Local => self.local,
        }
    }

    pub fn total(&self) -> u64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    fn slot(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Topup => &mut self.topup,
            Category::Unlimited => &mut self.unlimited,
            Category::Global => &mut self.global,
            Category::Region => &mut self.region,
            Category::Local => &mut self.local,
        }
    }
}

/// Outcome of comparing the remote total with the internal total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "records", rename_all = "snake_case")]
pub enum Verdict {
    Complete,
    /// The internal store is short this many records.
    Missing(u64),
    /// The internal store holds this many more records than the remote catalog.
    Extra(u64),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Complete => write!(f, "complete"),
            Verdict::Missing(n) => write!(f, "missing {} records", n),
            Verdict::Extra(n) => write!(f, "{} extra records in internal store", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub diff: i64,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Encodes an unavailable count as the `-1` sentinel used in reports.
pub fn sentinel(count: Option<u64>) -> i64 {
    count
        .and_then(|c| i64::try_from(c).ok())
        .unwrap_or(-1)
}

pub(crate) fn serialize_sentinel<S>(count: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(sentinel(*count))
}
