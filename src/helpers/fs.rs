//! File System Utilities
//!
//! Configuration directory management and fixture loading.

use crate::domain::Record;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("gov", "e-services", "egov-grid").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the console's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/egov-grid/` or `$XDG_CONFIG_HOME/egov-grid/`
/// - **macOS**: `~/Library/Application Support/gov.e-services.egov-grid/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\e-services\egov-grid\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let config_dir = project_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    Ok(config_dir.to_path_buf())
}

/// Load a JSON array of objects as records
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parse a JSON array of objects as records
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_str(content)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let records = parse_records(r#"[{"id": 1, "status": "pending"}, {"id": 2}]"#).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("status"), "pending");
    }

    #[test]
    fn test_parse_records_rejects_scalars() {
        assert!(matches!(parse_records("[1, 2]"), Err(Error::Json { .. })));
    }
}
