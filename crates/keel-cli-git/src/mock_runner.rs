// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::GitError;
use crate::runner::GitRunner;

/// Recorded invocation of the mock runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCall {
	pub args: Vec<String>,
	pub cwd: PathBuf,
	pub silent: bool,
}

#[derive(Clone, Debug)]
enum MockResponse {
	Output(String),
	Failure { exit_code: i32, stderr: String },
	Status(bool),
}

/// Scripted git runner for testing.
///
/// Responses are keyed by the exact argument vector joined with spaces.
/// Unscripted commands fail with exit code 128, like git outside a
/// repository.
#[derive(Clone, Default)]
pub struct MockGitRunner {
	responses: HashMap<String, MockResponse>,
	calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGitRunner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes `git <args>` succeed with `stdout`.
	pub fn with_output(mut self, args: &str, stdout: impl Into<String>) -> Self {
		self.responses
			.insert(args.to_string(), MockResponse::Output(stdout.into()));
		self
	}

	/// Makes `git <args>` exit with `exit_code`.
	pub fn with_failure(mut self, args: &str, exit_code: i32, stderr: impl Into<String>) -> Self {
		self.responses.insert(
			args.to_string(),
			MockResponse::Failure {
				exit_code,
				stderr: stderr.into(),
			},
		);
		self
	}

	/// Sets the result of a silent invocation such as `fetch`.
	pub fn with_status(mut self, args: &str, success: bool) -> Self {
		self.responses
			.insert(args.to_string(), MockResponse::Status(success));
		self
	}

	/// Returns the recorded calls.
	pub fn get_calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}

	/// Number of times `git <args>` was invoked.
	pub fn call_count(&self, args: &str) -> usize {
		self.get_calls()
			.iter()
			.filter(|call| call.args.join(" ") == args)
			.count()
	}

	/// Clears recorded calls.
	pub fn clear_calls(&self) {
		self.calls.lock().unwrap().clear();
	}

	fn record(&self, args: &[&str], cwd: &Path, silent: bool) -> Option<MockResponse> {
		self.calls.lock().unwrap().push(MockCall {
			args: args.iter().map(|s| s.to_string()).collect(),
			cwd: cwd.to_path_buf(),
			silent,
		});
		self.responses.get(&args.join(" ")).cloned()
	}
}

impl GitRunner for MockGitRunner {
	fn run(&self, _git_path: &Path, args: &[&str], cwd: &Path) -> Result<String, GitError> {
		match self.record(args, cwd, false) {
			Some(MockResponse::Output(stdout)) => Ok(stdout),
			Some(MockResponse::Status(true)) => Ok(String::new()),
			Some(MockResponse::Failure { exit_code, stderr }) => {
				Err(GitError::command_failed(args, Some(exit_code), stderr))
			}
			Some(MockResponse::Status(false)) | None => Err(GitError::command_failed(
				args,
				Some(128),
				"fatal: unscripted mock command".to_string(),
			)),
		}
	}

	fn run_silent(&self, _git_path: &Path, args: &[&str], cwd: &Path) -> Result<bool, GitError> {
		match self.record(args, cwd, true) {
			Some(MockResponse::Status(success)) => Ok(success),
			Some(MockResponse::Output(_)) => Ok(true),
			Some(MockResponse::Failure { .. }) | None => Ok(false),
		}
	}
}
