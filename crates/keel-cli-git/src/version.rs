// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use crate::error::GitError;

/// Oldest git release whose CLI output this crate knows how to read.
pub const MINIMUM_GIT_VERSION: GitVersion = GitVersion {
	major: 2,
	minor: 20,
	patch: 0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GitVersion {
	pub major: u32,
	pub minor: u32,
	pub patch: u32,
}

impl fmt::Display for GitVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}

impl GitVersion {
	/// Parses the output of `git version`, e.g. `git version 2.39.2` or
	/// `git version 2.41.0.windows.1`. A missing patch component reads as 0.
	pub fn parse(output: &str) -> Result<Self, GitError> {
		let invalid = || GitError::InvalidVersion(output.trim().to_string());

		let version = output
			.trim()
			.strip_prefix("git version ")
			.and_then(|rest| rest.split_whitespace().next())
			.ok_or_else(invalid)?;

		let mut parts = version.split('.');
		let mut component = |required: bool| -> Result<u32, GitError> {
			match parts.next() {
				Some(part) => part.parse().map_err(|_| invalid()),
				None if required => Err(invalid()),
				None => Ok(0),
			}
		};

		let major = component(true)?;
		let minor = component(true)?;
		let patch = component(false)?;

		Ok(Self {
			major,
			minor,
			patch,
		})
	}

	pub fn is_supported(&self) -> bool {
		*self >= MINIMUM_GIT_VERSION
	}
}
