//! Profile storage on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::Profile;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Get the profile file path.
fn profile_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "recsync").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("profile.json"))
}

/// Save the profile to disk.
pub fn save_profile(profile: &Profile) -> Result<()> {
    let path = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;

    fs::write(&path, &json).context("Failed to write profile file")?;

    // The profile names the user, keep it private (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load the profile, or an empty one if none was saved.
pub fn load_profile() -> Result<Profile> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(Profile::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read profile file")?;
    serde_json::from_str(&json).context("Invalid profile file")
}

/// Remove the stored profile.
pub fn clear_profile() -> Result<bool> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove profile file")?;
    Ok(true)
}
