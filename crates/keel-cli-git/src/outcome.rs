// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::error::GitError;

/// A memoized query outcome. Failures are kept so a failing subcommand is not
/// re-run on the next call.
#[derive(Debug)]
pub enum ResultOrError<T> {
	Value(T),
	Error(GitError),
}

impl<T> ResultOrError<T> {
	pub fn as_result(&self) -> Result<&T, &GitError> {
		match self {
			Self::Value(value) => Ok(value),
			Self::Error(error) => Err(error),
		}
	}

	pub fn value(&self) -> Option<&T> {
		self.as_result().ok()
	}

	pub fn error(&self) -> Option<&GitError> {
		self.as_result().err()
	}
}

impl<T> From<Result<T, GitError>> for ResultOrError<T> {
	fn from(result: Result<T, GitError>) -> Self {
		match result {
			Ok(value) => Self::Value(value),
			Err(error) => Self::Error(error),
		}
	}
}
