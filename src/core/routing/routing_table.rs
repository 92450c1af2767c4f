// Routing table for inbound fax lines.
//
// Maps the number a fax was sent to onto the SharePoint folder its document
// should be filed in. The table is built once at startup and never mutated
// afterwards; a lookup is a plain map read with no side effects.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a routing table override from disk.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("routing file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Routing data for one inbound fax line.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    /// Human label for the line. Only ever logged.
    pub description: String,
    /// Folder under the document library root that receives the documents.
    pub folder_name: String,
}

/// Immutable map from destination fax number (leading `+` included) to its
/// route.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: HashMap<String, RouteEntry>,
}

impl RoutingTable {
    /// The routes compiled into the binary. Used when no override file is
    /// configured.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "+10123456789".to_string(),
            RouteEntry {
                description: "first fax number".to_string(),
                folder_name: "faxfolder1".to_string(),
            },
        );
        entries.insert(
            "+11234567890".to_string(),
            RouteEntry {
                description: "second fax number".to_string(),
                folder_name: "faxfolder2".to_string(),
            },
        );
        entries.insert(
            "+19876543210".to_string(),
            RouteEntry {
                description: "third fax number".to_string(),
                folder_name: "faxfolder1".to_string(),
            },
        );
        Self { entries }
    }

    /// Parse a table from a JSON object keyed by fax number.
    pub fn from_json_str(json: &str) -> Result<Self, RoutingError> {
        let entries: HashMap<String, RouteEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Load an override table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RoutingError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Route for a destination number. Keys must match verbatim; unknown
    /// numbers return `None`.
    pub fn lookup(&self, destination: &str) -> Option<&RouteEntry> {
        self.entries.get(destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_routes_cover_the_three_lines() {
        let table = RoutingTable::builtin();
        assert_eq!(table.len(), 3);

        let entry = table.lookup("+11234567890").unwrap();
        assert_eq!(entry.description, "second fax number");
        assert_eq!(entry.folder_name, "faxfolder2");

        // Two lines share a folder; that is allowed.
        assert_eq!(table.lookup("+10123456789").unwrap().folder_name, "faxfolder1");
        assert_eq!(table.lookup("+19876543210").unwrap().folder_name, "faxfolder1");
    }

    #[test]
    fn lookup_misses_return_none() {
        let table = RoutingTable::builtin();
        assert!(table.lookup("+19999999999").is_none());
        // No normalization: a key without the plus is a different key.
        assert!(table.lookup("11234567890").is_none());
    }

    #[test]
    fn override_table_parses_from_json() {
        let json = r#"{
            "+15550001111": { "description": "warehouse fax", "folder_name": "warehouse" },
            "+15550002222": { "description": "front desk fax", "folder_name": "frontdesk" }
        }"#;

        let table = RoutingTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("+15550001111").unwrap().folder_name, "warehouse");
        assert!(!table.is_empty());
    }

    #[test]
    fn override_table_loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"+15550003333": {{"description": "ops fax", "folder_name": "opsfolder"}}}}"#
        )
        .unwrap();

        let table = RoutingTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.lookup("+15550003333").unwrap().folder_name, "opsfolder");
    }

    #[test]
    fn malformed_override_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let err = RoutingTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, RoutingError::Parse(_)));
    }

    #[test]
    fn missing_override_file_is_an_io_error() {
        let err = RoutingTable::from_json_file("/definitely/not/here/routes.json").unwrap_err();
        assert!(matches!(err, RoutingError::Io(_)));
    }
}
