// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::layer::*;
use crate::paths::{workspace_config_path, PathsConfig};
use crate::ConfigError;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	UserFile = 30,
	WorkspaceFile = 40,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;

	/// A required source that fails to load fails the whole load instead of
	/// being skipped.
	fn is_required(&self) -> bool {
		false
	}
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		// Empty: defaults are applied by KeelConfig::from_layer
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// User config: ~/.config/keel/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// Workspace config: <workspace>/keel.toml
	pub fn workspace(workspace: &Path) -> Self {
		Self {
			path: workspace_config_path(workspace),
			precedence: Precedence::WorkspaceFile,
			name: "workspace-config",
			required: false,
		}
	}

	/// Custom file path with specified precedence
	pub fn custom(path: PathBuf, precedence: Precedence, name: &'static str) -> Self {
		Self {
			path,
			precedence,
			name,
			required: false,
		}
	}

	/// File named with `--config`: takes the workspace file's place and must
	/// exist and parse.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::WorkspaceFile,
			name: "custom-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}
	fn is_required(&self) -> bool {
		self.required
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::invalid_value(
					"--config",
					format!("{} does not exist", self.path.display()),
				));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path)?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Recognizes `KEEL_GIT_BINARY_PATH`, `KEEL_REPOSITORY_URLS` (comma
/// separated), `KEEL_DEFAULT_BRANCH`, `KEEL_DEFAULT_REMOTE`,
/// `KEEL_TAG_SEPARATOR`, `KEEL_LOG_LEVEL` and `KEEL_LOG_FORMAT`. Empty values
/// are ignored.
pub struct EnvSource;

impl EnvSource {
	/// Builds a layer from `(name, value)` pairs.
	pub fn layer_from_vars<I>(vars: I) -> ConfigLayer
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut layer = ConfigLayer::default();

		for (key, value) in vars {
			if !key.starts_with("KEEL_") {
				continue;
			}

			let value = value.trim().to_string();
			if value.is_empty() {
				continue;
			}

			trace!(key = %key, "processing env var");

			match key.as_str() {
				"KEEL_GIT_BINARY_PATH" => {
					layer.git.get_or_insert_with(GitLayer::default).binary_path =
						Some(PathBuf::from(value));
				}
				"KEEL_REPOSITORY_URLS" => {
					let urls: Vec<String> = value
						.split(',')
						.map(str::trim)
						.filter(|url| !url.is_empty())
						.map(str::to_string)
						.collect();
					if !urls.is_empty() {
						repository(&mut layer).urls = Some(urls);
					}
				}
				"KEEL_DEFAULT_BRANCH" => {
					repository(&mut layer).default_branch = Some(value);
				}
				"KEEL_DEFAULT_REMOTE" => {
					repository(&mut layer).default_remote = Some(value);
				}
				"KEEL_TAG_SEPARATOR" => {
					repository(&mut layer).tag_separator = Some(value);
				}

				// Logging
				"KEEL_LOG_LEVEL" => {
					layer
						.logging
						.get_or_insert_with(LoggingLayer::default)
						.level = Some(value);
				}
				"KEEL_LOG_FORMAT" => {
					layer
						.logging
						.get_or_insert_with(LoggingLayer::default)
						.format = Some(value);
				}

				_ => {
					// Unknown KEEL_ variable, ignore
				}
			}
		}

		layer
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(Self::layer_from_vars(std::env::vars()))
	}
}

fn repository(layer: &mut ConfigLayer) -> &mut RepositoryLayer {
	layer
		.repository
		.get_or_insert_with(RepositoryLayer::default)
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	/// Workspace whose `keel.toml` is loaded; defaults to the current
	/// directory.
	pub workspace: Option<PathBuf>,
	/// Explicit config file, loaded instead of the workspace file.
	pub config_file: Option<PathBuf>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref level) = self.overrides.log_level {
			layer
				.logging
				.get_or_insert_with(LoggingLayer::default)
				.level = Some(level.clone());
		}

		if let Some(ref format) = self.overrides.log_format {
			layer
				.logging
				.get_or_insert_with(LoggingLayer::default)
				.format = Some(format.clone());
		}

		Ok(layer)
	}
}
