// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// File name of the per-workspace config, looked up in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "keel.toml";

/// Resolved config file locations for Keel.
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// User config file: ~/.config/keel/config.toml
	pub user_config_file: PathBuf,
}

impl PathsConfig {
	pub fn config_dir(&self) -> PathBuf {
		self.user_config_file
			.parent()
			.map(|p| p.to_path_buf())
			.unwrap_or_else(|| self.user_config_file.clone())
	}
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			user_config_file: PathBuf::from("~/.config/keel/config.toml"),
		}
	}
}

/// Resolve the user config location from `XDG_CONFIG_HOME`, falling back to
/// `~/.config`.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let config_home = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
		Some(dir) => PathBuf::from(dir),
		None => dirs::home_dir()
			.ok_or(ConfigError::HomeDirNotFound)?
			.join(".config"),
	};

	tracing::debug!(config_home = %config_home.display(), "resolved XDG paths");

	Ok(PathsConfig {
		user_config_file: config_home.join("keel/config.toml"),
	})
}

/// Workspace config file inside `workspace`.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
	workspace.join(WORKSPACE_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_xdg_paths_succeeds() {
		let paths = resolve_xdg_paths().unwrap();
		assert!(paths.user_config_file.ends_with("keel/config.toml"));
		assert!(paths.config_dir().ends_with("keel"));
	}

	#[test]
	fn test_workspace_config_path() {
		assert_eq!(
			workspace_config_path(Path::new("/src/mono")),
			PathBuf::from("/src/mono/keel.toml")
		);
	}
}
