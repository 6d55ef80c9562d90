/*
 * Directory helpers for the per-user configuration location. Preferences and
 * the log file both live in the application's local (non-roaming) config
 * directory; an explicit directory given on the command line replaces it.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/*
 * Makes sure `dir` exists, creating it and its parents when needed.
 * Returns `None` (after logging) when the directory cannot be created.
 */
pub fn ensure_dir(dir: &Path) -> Option<PathBuf> {
    if dir.is_dir() {
        log::trace!("PathUtils: Directory already exists: {dir:?}");
        return Some(dir.to_path_buf());
    }
    if let Err(e) = fs::create_dir_all(dir) {
        log::error!("PathUtils: Failed to create directory {dir:?}: {e}");
        return None;
    }
    log::debug!("PathUtils: Created directory: {dir:?}");
    Some(dir.to_path_buf())
}

/*
 * Resolves and creates the local configuration directory for `app_name`
 * (e.g. `~/.config/<app_name>` on Linux, `AppData/Local/<app_name>/config` on
 * Windows). No organization qualifier is used.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    ensure_dir(proj_dirs.config_local_dir())
}

/*
 * Picks the configuration directory: the override if one was given, otherwise
 * the platform default for `app_name`.
 */
pub fn resolve_config_dir(override_dir: Option<&Path>, app_name: &str) -> Option<PathBuf> {
    match override_dir {
        Some(dir) => ensure_dir(dir),
        None => get_base_app_config_local_dir(app_name),
    }
}
