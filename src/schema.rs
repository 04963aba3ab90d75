use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{
    ColumnId, ColumnKind, ColumnType, GeoId, MetaId, NamespaceId, RawValue, UserId, ValidTime,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Namespace {
    pub namespace_id: NamespaceId,
    pub path: String,
    pub description: Option<String>,
    pub meta_id: MetaId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: ValidTime,
}

/// One audit record per bulk-write scope; every row the scope writes points at it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub meta_id: MetaId,
    pub notes: Option<String>,
    pub created_at: ValidTime,
    pub created_by: UserId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Column {
    pub col_id: ColumnId,
    pub namespace_id: NamespaceId,
    pub canonical_path: String,
    pub kind: ColumnKind,
    pub value_type: ColumnType,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub meta_id: MetaId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geography {
    pub geo_id: GeoId,
    pub namespace_id: NamespaceId,
    pub path: String,
    pub meta_id: MetaId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnCreate {
    pub path: String,
    pub aliases: Vec<String>,
    pub kind: ColumnKind,
    pub value_type: ColumnType,
    pub description: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeographyCreate {
    pub path: String,
    /// Optional WKB geometry.
    pub geometry: Option<Vec<u8>>,
    /// Optional WKB interior point used for labeling.
    pub internal_point: Option<Vec<u8>>,
}

/// Sparse tabular input for a bulk load: geography path, then source column
/// alias, to a raw scalar. Iteration order is deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TabularBatch {
    cells: BTreeMap<String, BTreeMap<String, RawValue>>,
}

impl TabularBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        geography: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<RawValue>,
    ) {
        self.cells
            .entry(geography.into())
            .or_default()
            .insert(column.into(), value.into());
    }

    pub fn geography_ids(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, RawValue>)> {
        self.cells.iter().map(|(path, row)| (path.as_str(), row))
    }

    pub fn row(&self, geography: &str) -> Option<&BTreeMap<String, RawValue>> {
        self.cells.get(geography)
    }

    /// Number of geography rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }
}

/// Canonicalize a human-readable name into a path segment: trimmed,
/// NFC-normalized, lowercased, spaces to hyphens, dots dropped.
pub fn pathify(name: &str) -> String {
    name.trim()
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-")
        .replace('.', "")
}
