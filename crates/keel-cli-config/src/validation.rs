// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use tracing::warn;

use crate::runtime::KeelConfig;
use crate::ConfigError;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or ConfigError::InvalidValue with details.
pub fn validate_config(config: &KeelConfig) -> Result<(), ConfigError> {
	validate_repository(config)?;
	validate_git(config);

	Ok(())
}

fn validate_repository(config: &KeelConfig) -> Result<(), ConfigError> {
	let repository = &config.repository;

	for (field, value) in [
		("repository.default_branch", &repository.default_branch),
		("repository.default_remote", &repository.default_remote),
		("repository.tag_separator", &repository.tag_separator),
	] {
		if value.trim().is_empty() {
			return Err(ConfigError::invalid_value(field, "value cannot be empty"));
		}
	}

	if repository.default_remote.contains('/') {
		return Err(ConfigError::invalid_value(
			"repository.default_remote",
			format!(
				"remote name cannot contain '/': {}",
				repository.default_remote
			),
		));
	}

	if let Some(index) = repository.urls.iter().position(|url| url.is_empty()) {
		return Err(ConfigError::invalid_value(
			format!("repository.urls[{index}]"),
			"url cannot be empty",
		));
	}

	Ok(())
}

fn validate_git(config: &KeelConfig) {
	if let Some(path) = &config.git.binary_path {
		// Not fatal here; commands fail later with GitNotFound.
		if !path.exists() {
			warn!(path = %path.display(), "configured git binary does not exist");
		}
	}
}
