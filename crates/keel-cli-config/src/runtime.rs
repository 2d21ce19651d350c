// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::ConfigError;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_TAG_SEPARATOR: &str = "_";

/// The final, validated configuration for Keel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeelConfig {
	pub repository: RepositoryConfig,
	pub git: GitConfig,
	pub logging: LoggingConfig,

	/// Resolved XDG paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,

	/// Optional sources that failed to load and were skipped, as
	/// `<source>: <error>`. Kept so they can be reported once logging is up.
	#[serde(skip)]
	pub load_warnings: Vec<String>,
}

/// Baseline repository settings consumed by the git layer. Read-only once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
	/// Candidate baseline URLs, in configured order.
	pub urls: Vec<String>,
	pub default_branch: String,
	pub default_remote: String,
	pub tag_separator: String,
	/// Email shown in "set your email" instructions.
	pub sample_email: Option<String>,
}

impl RepositoryConfig {
	/// `<default_remote>/<default_branch>`, used when no remote matches the
	/// baseline URLs.
	pub fn default_fully_qualified_remote_branch(&self) -> String {
		format!("{}/{}", self.default_remote, self.default_branch)
	}
}

impl Default for RepositoryConfig {
	fn default() -> Self {
		Self {
			urls: Vec::new(),
			default_branch: DEFAULT_BRANCH.to_string(),
			default_remote: DEFAULT_REMOTE.to_string(),
			tag_separator: DEFAULT_TAG_SEPARATOR.to_string(),
			sample_email: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
	/// Explicit git executable. `None` searches `PATH`.
	pub binary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	Warn,
	#[default]
	Info,
	Debug,
	Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
	Compact,
}

impl KeelConfig {
	/// Build runtime config from a merged layer and paths.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		Ok(Self {
			repository: build_repository_config(layer.repository)?,
			git: build_git_config(layer.git),
			logging: build_logging_config(layer.logging),
			paths,
			load_warnings: Vec::new(),
		})
	}
}

fn build_repository_config(layer: Option<RepositoryLayer>) -> Result<RepositoryConfig, ConfigError> {
	let layer = layer.unwrap_or_default();

	let urls = match (layer.url, layer.urls) {
		(Some(_), Some(_)) => {
			return Err(ConfigError::invalid_value(
				"repository.url",
				"set either `url` or `urls`, not both",
			));
		}
		(Some(url), None) => vec![url],
		(None, Some(urls)) => urls,
		(None, None) => Vec::new(),
	};

	Ok(RepositoryConfig {
		urls: urls
			.into_iter()
			.map(|url| url.trim().to_string())
			.collect(),
		default_branch: layer
			.default_branch
			.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
		default_remote: layer
			.default_remote
			.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
		tag_separator: layer
			.tag_separator
			.unwrap_or_else(|| DEFAULT_TAG_SEPARATOR.to_string()),
		sample_email: layer.sample_email,
	})
}

fn build_git_config(layer: Option<GitLayer>) -> GitConfig {
	let layer = layer.unwrap_or_default();
	GitConfig {
		binary_path: layer
			.binary_path
			.filter(|path| !path.as_os_str().is_empty()),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> LoggingConfig {
	let layer = layer.unwrap_or_default();
	LoggingConfig {
		level: parse_log_level(layer.level.as_deref()),
		format: parse_log_format(layer.format.as_deref()),
	}
}

fn parse_log_level(s: Option<&str>) -> LogLevel {
	match s {
		Some("error") => LogLevel::Error,
		Some("warn") => LogLevel::Warn,
		Some("info") => LogLevel::Info,
		Some("debug") => LogLevel::Debug,
		Some("trace") => LogLevel::Trace,
		_ => LogLevel::Info,
	}
}

fn parse_log_format(s: Option<&str>) -> LogFormat {
	match s {
		Some("json") => LogFormat::Json,
		Some("compact") => LogFormat::Compact,
		Some("pretty") => LogFormat::Pretty,
		_ => LogFormat::Pretty,
	}
}
