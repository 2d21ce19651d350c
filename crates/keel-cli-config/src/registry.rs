// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration registry - manages sources and merges layers.

use tracing::{debug, info, warn};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::runtime::KeelConfig;
use crate::sources::ConfigSource;
use crate::validation::validate_config;
use crate::ConfigError;

/// Registry that manages configuration sources and merges them.
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		debug!(source = source.name(), precedence = ?source.precedence(), "registering config source");
		self.sources.push(source);
	}

	/// Load configuration from all sources, merge, and validate.
	///
	/// Sources are merged lowest precedence first, so higher precedence
	/// sources override lower ones. An optional source that fails to load is
	/// skipped and recorded in [`KeelConfig::load_warnings`]; a required one
	/// fails the load.
	pub fn load(&self, paths: PathsConfig) -> Result<KeelConfig, ConfigError> {
		let mut sorted_sources: Vec<_> = self.sources.iter().collect();
		sorted_sources.sort_by_key(|s| s.precedence());

		debug!(
			source_count = sorted_sources.len(),
			"loading configuration from sources"
		);

		let mut merged = ConfigLayer::default();
		let mut load_warnings = Vec::new();
		for source in &sorted_sources {
			match source.load() {
				Ok(layer) => {
					debug!(source = source.name(), "merging config layer");
					merged.merge(layer);
				}
				Err(e) if source.is_required() => {
					return Err(e);
				}
				Err(e) => {
					warn!(source = source.name(), error = %e, "failed to load config source, skipping");
					load_warnings.push(format!("{}: {e}", source.name()));
				}
			}
		}

		let mut config = KeelConfig::from_layer(merged, paths)?;
		config.load_warnings = load_warnings;
		validate_config(&config)?;

		info!(
				repository_urls = config.repository.urls.len(),
				default_branch = %config.repository.default_fully_qualified_remote_branch(),
				log_level = ?config.logging.level,
				"configuration loaded"
		);

		Ok(config)
	}

	pub fn source_count(&self) -> usize {
		self.sources.len()
	}
}

impl Default for ConfigRegistry {
	fn default() -> Self {
		Self::new()
	}
}
