//! Data file format and schema migration

use super::Dataset;
use crate::error::{Result, TurftapError};
use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Data file format with schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    /// Schema version for migration
    pub schema_version: String,
    /// The stored records
    pub data: Dataset,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DataFile {
    /// Wrap a dataset with the current schema version
    pub fn new(data: Dataset) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            data,
            extra: HashMap::new(),
        }
    }

    /// Get the dataset, consuming the file
    pub fn into_data(self) -> Dataset {
        self.data
    }

    /// Parse schema version
    pub fn parse_version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::parse(&self.schema_version)
    }
}

/// Data file schema migrator
pub struct DataMigrator;

impl DataMigrator {
    /// Migrate a data file to the current schema version
    pub fn migrate(mut file: DataFile) -> Result<DataFile> {
        let version = file
            .parse_version()
            .ok_or_else(|| TurftapError::Store("Invalid schema version format".to_string()))?;

        let current = ProtocolVersion::V1_0;
        if !version.is_compatible(&current) {
            return Err(TurftapError::Store(format!(
                "Incompatible schema version: {} (expected {}.x)",
                file.schema_version, current.major
            )));
        }

        // Minor versions within 1.x only add defaulted fields.
        file.schema_version = CURRENT_SCHEMA_VERSION.to_string();
        Ok(file)
    }

    /// Check if a file needs migration
    pub fn needs_migration(file: &DataFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_file_creation() {
        let file = DataFile::new(Dataset::new());
        assert_eq!(file.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(!DataMigrator::needs_migration(&file));

        let version = file.parse_version().unwrap();
        assert_eq!(version, ProtocolVersion::V1_0);
    }

    #[test]
    fn test_migrator_accepts_same_major() {
        let mut file = DataFile::new(Dataset::new());
        file.schema_version = "1.3".to_string();
        assert!(DataMigrator::needs_migration(&file));

        let migrated = DataMigrator::migrate(file).unwrap();
        assert_eq!(migrated.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_migrator_incompatible_version() {
        let mut file = DataFile::new(Dataset::new());
        file.schema_version = "2.0".to_string();
        assert!(DataMigrator::migrate(file).is_err());

        let mut file = DataFile::new(Dataset::new());
        file.schema_version = "v1".to_string();
        assert!(DataMigrator::migrate(file).is_err());
    }

    #[test]
    fn test_data_file_forward_compatibility() {
        let json = r#"{
            "schema_version": "1.0",
            "data": { "users": {}, "listings": {} },
            "future_field": "some value"
        }"#;

        let file: DataFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.schema_version, "1.0");
        assert!(file.extra.contains_key("future_field"));
        assert!(file.into_data().is_empty());
    }
}
