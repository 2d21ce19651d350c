// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::GitError;

/// Runs single git subcommands. Every query in this crate goes through this
/// trait so tests can substitute scripted output.
pub trait GitRunner: Send + Sync {
	/// Runs `git <args>` in `cwd` and returns its stdout.
	///
	/// A non-zero exit becomes [`GitError::CommandFailed`]; failing to start
	/// the process becomes [`GitError::Spawn`].
	fn run(&self, git_path: &Path, args: &[&str], cwd: &Path) -> Result<String, GitError>;

	/// Runs `git <args>` in `cwd` with all stdio discarded and reports whether
	/// it exited successfully.
	fn run_silent(&self, git_path: &Path, args: &[&str], cwd: &Path) -> Result<bool, GitError>;
}

/// [`GitRunner`] that spawns the real git executable and blocks until it
/// exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessGitRunner;

impl ProcessGitRunner {
	pub fn new() -> Self {
		Self
	}
}

impl GitRunner for ProcessGitRunner {
	fn run(&self, git_path: &Path, args: &[&str], cwd: &Path) -> Result<String, GitError> {
		let mut cmd = Command::new(git_path);
		cmd.args(args).current_dir(cwd);

		tracing::trace!(
				cmd = %format!("git {}", args.join(" ")),
				cwd = %cwd.display(),
				"running git command"
		);

		let output = cmd.output().map_err(|e| spawn_error(args, e))?;

		if output.status.success() {
			Ok(String::from_utf8_lossy(&output.stdout).into_owned())
		} else {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			tracing::debug!(
					args = ?args,
					exit_code = ?output.status.code(),
					stderr = %stderr,
					"git command returned non-zero"
			);
			Err(GitError::command_failed(args, output.status.code(), stderr))
		}
	}

	fn run_silent(&self, git_path: &Path, args: &[&str], cwd: &Path) -> Result<bool, GitError> {
		let mut cmd = Command::new(git_path);
		cmd.args(args)
			.current_dir(cwd)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null());

		tracing::trace!(
				cmd = %format!("git {}", args.join(" ")),
				cwd = %cwd.display(),
				"running silent git command"
		);

		let status = cmd.status().map_err(|e| spawn_error(args, e))?;
		Ok(status.success())
	}
}

fn spawn_error(args: &[&str], source: std::io::Error) -> GitError {
	if source.kind() == std::io::ErrorKind::NotFound {
		tracing::warn!("git executable could not be started");
	}
	GitError::Spawn {
		args: args.iter().map(|s| s.to_string()).collect(),
		source,
	}
}
