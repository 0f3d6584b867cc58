//! File persistence helpers.
//!
//! Reports can contain per-call metadata (user ids, request tags), so files
//! are written atomically and readable only by the owner.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - Linux: `~/.config/costguard`
/// - macOS: `~/Library/Application Support/costguard`
/// - Windows: `%APPDATA%\costguard`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("costguard"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default data directory for exported reports.
///
/// - Linux: `~/.local/share/costguard`
/// - macOS: `~/Library/Application Support/costguard`
/// - Windows: `%APPDATA%\costguard`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("costguard"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Returns the default report file path.
pub fn default_report_path() -> PathBuf {
    default_data_dir().join("report.json")
}

// ============================================================================
// File Permissions
// ============================================================================

/// Sets owner-only file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// Sets owner-only directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Writes text atomically (temp file + rename) with owner-only permissions.
///
/// Creates missing parent directories.
pub async fn save_text(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            ensure_dir(parent).await?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, contents).await?;
    tokio::fs::rename(&temp_path, path).await?;
    set_restrictive_permissions(path).await?;

    debug!(path = %path.display(), bytes = contents.len(), "File saved");
    Ok(())
}

/// Saves data as pretty JSON.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data)?;
    save_text(path, &json).await
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

/// Loads data from a JSON file, returning the default if it is missing or
/// unreadable.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(e) => {
            if !e.is_not_found() {
                warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            }
            T::default()
        }
    }
}

/// Ensures a directory exists with owner-only permissions.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_config_path().ends_with("costguard/config.json"));
        assert!(default_report_path().ends_with("costguard/report.json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("report.csv");

        save_text(&test_file, "timestamp,model\n").await.unwrap();

        let metadata = tokio::fs::metadata(&test_file).await.unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.json");

        save_json(&path, &serde_json::json!({"ok": true})).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0], "report.json");
    }
}
