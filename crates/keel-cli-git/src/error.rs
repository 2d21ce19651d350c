// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io;
use thiserror::Error;

use crate::version::GitVersion;

#[derive(Debug, Error)]
pub enum GitError {
	#[error("unable to find the git binary; install git or set KEEL_GIT_BINARY_PATH")]
	GitNotFound,

	#[error("not a git working tree: {0}")]
	NotAGitRepo(String),

	#[error(
		"git {} failed{}: {stderr}",
		.args.join(" "),
		.exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default()
	)]
	CommandFailed {
		args: Vec<String>,
		exit_code: Option<i32>,
		stderr: String,
	},

	#[error("failed to spawn git {}: {source}", .args.join(" "))]
	Spawn {
		args: Vec<String>,
		#[source]
		source: io::Error,
	},

	#[error("git version {found} is older than the minimum supported version {minimum}")]
	VersionTooOld {
		found: GitVersion,
		minimum: GitVersion,
	},

	#[error("unable to parse git version from output: {0}")]
	InvalidVersion(String),

	/// The failure has already been explained to the user through the terminal.
	#[error("operation failed; details were reported above")]
	AlreadyReported,

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
}

impl GitError {
	pub(crate) fn command_failed(args: &[&str], exit_code: Option<i32>, stderr: String) -> Self {
		Self::CommandFailed {
			args: args.iter().map(|s| s.to_string()).collect(),
			exit_code,
			stderr,
		}
	}

	/// Exit code of the failed git process, if it ran at all.
	pub fn exit_code(&self) -> Option<i32> {
		match self {
			Self::CommandFailed { exit_code, .. } => *exit_code,
			_ => None,
		}
	}

	pub fn is_already_reported(&self) -> bool {
		matches!(self, Self::AlreadyReported)
	}
}
