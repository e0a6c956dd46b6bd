//! The casting record model.
//!
//! A [`Record`] is constructed exclusively during store load and never
//! mutated afterwards. All fields are UTF-8 text; a field absent from the
//! source is the empty string, never a null marker the query engine has to
//! special-case.

use serde::{Deserialize, Serialize};

/// One casting: a manufactured structural part record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, case-sensitive identifier (e.g. an alphanumeric part code).
    pub id: String,
    /// Free-text description.
    pub description: String,
    /// Applicable years as free text (e.g. "2021-2023"); opaque, never
    /// parsed into a structured range.
    pub applicable_years: String,
    /// Trim/variant label.
    pub configuration: String,
    /// Material.
    pub material: String,
    /// Additional comments; may be empty.
    pub comments: String,
}

/// One raw row from the ingestion source, before validation.
///
/// Every field except `id` defaults to the empty string when the source
/// omits the column or leaves the cell blank. Rows are converted into
/// [`Record`]s by [`CatalogStore::load`](crate::CatalogStore::load), which
/// rejects rows without an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    /// Identifier column; an empty value fails the load.
    #[serde(default)]
    pub id: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Applicable years as free text.
    #[serde(default)]
    pub applicable_years: String,
    /// Trim/variant label.
    #[serde(default)]
    pub configuration: String,
    /// Material.
    #[serde(default)]
    pub material: String,
    /// Additional comments.
    #[serde(default)]
    pub comments: String,
}

impl From<RawRow> for Record {
    fn from(row: RawRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            applicable_years: row.applicable_years,
            configuration: row.configuration,
            material: row.material,
            comments: row.comments,
        }
    }
}
