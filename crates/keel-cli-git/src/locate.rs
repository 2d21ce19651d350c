// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::GitError;

type Search = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Resolves the git executable once and remembers the answer, including
/// "not found", for the lifetime of the locator.
pub struct GitLocator {
	override_path: Option<PathBuf>,
	search: Search,
	resolved: OnceLock<Option<PathBuf>>,
}

impl GitLocator {
	/// Locator that prefers `override_path` and otherwise searches `PATH`.
	pub fn new(override_path: Option<PathBuf>) -> Self {
		Self::with_search(override_path, search_path)
	}

	/// Locator with a custom search used when no override is configured.
	pub fn with_search<F>(override_path: Option<PathBuf>, search: F) -> Self
	where
		F: Fn() -> Option<PathBuf> + Send + Sync + 'static,
	{
		Self {
			override_path: override_path.filter(|p| !p.as_os_str().is_empty()),
			search: Box::new(search),
			resolved: OnceLock::new(),
		}
	}

	pub fn resolve(&self) -> Option<&Path> {
		self.resolved
			.get_or_init(|| {
				let resolved = match &self.override_path {
					Some(path) => {
						tracing::debug!(path = %path.display(), "using configured git binary");
						Some(path.clone())
					}
					None => (self.search)(),
				};

				match &resolved {
					Some(path) => tracing::debug!(path = %path.display(), "resolved git binary"),
					None => tracing::warn!("git not found in PATH"),
				}
				resolved
			})
			.as_deref()
	}

	pub fn require(&self) -> Result<&Path, GitError> {
		self.resolve().ok_or(GitError::GitNotFound)
	}
}

impl fmt::Debug for GitLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GitLocator")
			.field("override_path", &self.override_path)
			.field("resolved", &self.resolved.get())
			.finish()
	}
}

fn search_path() -> Option<PathBuf> {
	match which::which("git") {
		Ok(path) => Some(path),
		Err(e) => {
			tracing::trace!(error = %e, "git lookup in PATH failed");
			None
		}
	}
}
