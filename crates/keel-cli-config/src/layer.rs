// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use serde::Deserialize;
use std::path::PathBuf;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub repository: Option<RepositoryLayer>,
	#[serde(default)]
	pub git: Option<GitLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

/// `[repository]`: which upstream counts as the baseline and how it is named.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryLayer {
	/// Single baseline URL. Mutually exclusive with `urls`.
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub urls: Option<Vec<String>>,
	#[serde(default)]
	pub default_branch: Option<String>,
	#[serde(default)]
	pub default_remote: Option<String>,
	#[serde(default)]
	pub tag_separator: Option<String>,
	#[serde(default)]
	pub sample_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitLayer {
	#[serde(default)]
	pub binary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl ConfigLayer {
	/// Merge another layer into this one. Values set in `other` win.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.repository, other.repository, RepositoryLayer::merge);
		merge_option(&mut self.git, other.git, GitLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

impl RepositoryLayer {
	fn merge(&mut self, other: RepositoryLayer) {
		// `url` and `urls` describe the same setting; a layer that sets either
		// replaces both.
		if other.url.is_some() || other.urls.is_some() {
			self.url = other.url;
			self.urls = other.urls;
		}
		if other.default_branch.is_some() {
			self.default_branch = other.default_branch;
		}
		if other.default_remote.is_some() {
			self.default_remote = other.default_remote;
		}
		if other.tag_separator.is_some() {
			self.tag_separator = other.tag_separator;
		}
		if other.sample_email.is_some() {
			self.sample_email = other.sample_email;
		}
	}
}

impl GitLayer {
	fn merge(&mut self, other: GitLayer) {
		if other.binary_path.is_some() {
			self.binary_path = other.binary_path;
		}
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}
}
