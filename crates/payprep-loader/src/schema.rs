use std::collections::HashMap;

use serde::Deserialize;

/// Canonical columns every transaction export must provide after mapping.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "timestamp",
    "country",
    "amount",
    "psp",
    "card",
    "success",
    "is_3d_secured",
];

/// Rename table from raw export headers to canonical column names.
///
/// Loaded from a TOML file of the form:
///
/// ```toml
/// [rename]
/// tmsp = "timestamp"
/// PSP = "psp"
/// "3D_secured" = "is_3d_secured"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub rename: HashMap<String, String>,
}

impl ColumnMapping {
    /// Header names as they would appear after applying this mapping.
    pub fn mapped_headers(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|raw| {
                self.rename
                    .get(raw)
                    .cloned()
                    .unwrap_or_else(|| raw.clone())
            })
            .collect()
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        // Header names as emitted by the original spreadsheet export.
        let rename = HashMap::from([
            ("tmsp".to_string(), "timestamp".to_string()),
            ("PSP".to_string(), "psp".to_string()),
            ("3D_secured".to_string(), "is_3d_secured".to_string()),
        ]);
        Self { rename }
    }
}
