//! Token storage.
//!
//! Reads/writes ~/.config/formgrid/auth.json (0600 on Unix), so a login
//! from any FormGrid tool is picked up by the others.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Authentication credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Bearer token for the storage service
    pub token: String,
    /// API base URL (e.g., "https://ops.example.com")
    pub api_base: String,
}

impl AuthCredentials {
    pub fn new(token: String, api_base: String) -> Self {
        Self { token, api_base }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("formgrid/auth.json"))
}

/// Load saved auth credentials from disk.
/// Returns None if no credentials are saved or if the file is invalid.
pub fn load_auth() -> Option<AuthCredentials> {
    let path = auth_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save auth credentials to disk.
/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_auth(creds: &AuthCredentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved auth credentials.
pub fn delete_auth() -> Result<(), String> {
    let Some(path) = auth_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}
