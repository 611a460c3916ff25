use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Arrangement of a section's fields on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            _ => Err(format!("Invalid layout: {}", s)),
        }
    }
}

/// One group of fields rendered together under a single layout.
///
/// `fields` keeps insertion order for display; membership is set-like (a
/// field id appears at most once per section, though nothing stops it from
/// appearing in several sections). `created_at` is epoch milliseconds
/// assigned at creation and never mutated; it serializes under the wire
/// name `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub layout: Layout,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "timestamp", default)]
    pub created_at: i64,
}

impl Section {
    pub fn new(layout: Layout, fields: Vec<String>) -> Self {
        Self {
            layout,
            fields,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Empty sections are transient: they are pruned when editing ends and
    /// filtered out at save time.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
