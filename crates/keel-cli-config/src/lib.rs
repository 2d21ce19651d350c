// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the Keel CLI.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides
//! - Configuration validation

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{
	GitConfig, KeelConfig, LogFormat, LogLevel, LoggingConfig, RepositoryConfig, DEFAULT_BRANCH,
	DEFAULT_REMOTE, DEFAULT_TAG_SEPARATOR,
};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration from all sources with default precedence, using the
/// current directory as the workspace.
pub fn load_config() -> Result<KeelConfig, ConfigError> {
	load_config_with_cli(sources::CliOverrides::default())
}

/// Load configuration with CLI overrides.
///
/// `--config` replaces the workspace `keel.toml` at the same precedence and,
/// unlike the implicit files, must exist and parse.
pub fn load_config_with_cli(cli: sources::CliOverrides) -> Result<KeelConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::user(&paths)));
	match (&cli.config_file, &cli.workspace) {
		(Some(file), _) => {
			registry.register(Box::new(sources::FileSource::explicit(file.clone())));
		}
		(None, Some(workspace)) => {
			registry.register(Box::new(sources::FileSource::workspace(workspace)));
		}
		(None, None) => {
			let cwd = std::env::current_dir()?;
			registry.register(Box::new(sources::FileSource::workspace(&cwd)));
		}
	}
	registry.register(Box::new(sources::EnvSource));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load(paths)
}
