// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use keel_cli_config::RepositoryConfig;

use crate::error::GitError;
use crate::locate::GitLocator;
use crate::outcome::ResultOrError;
use crate::repo_info::RepoInfo;
use crate::runner::{GitRunner, ProcessGitRunner};
use crate::terminal::{ConsoleTerminal, Terminal};
use crate::version::{GitVersion, MINIMUM_GIT_VERSION};

/// Exit status of `git config <key>` when the key is not set.
const CONFIG_KEY_NOT_FOUND: i32 = 1;

/// Per-process memo slots. Each is filled at most once; there is no refresh.
#[derive(Debug, Default)]
pub(crate) struct RepoCache {
	pub(crate) repo_info: OnceLock<Option<RepoInfo>>,
	pub(crate) email: OnceLock<ResultOrError<Option<String>>>,
	pub(crate) hooks_path: OnceLock<ResultOrError<PathBuf>>,
}

/// Git state of one working directory, as seen by the build orchestrator.
///
/// Every query shells out to the installed git binary through a
/// [`GitRunner`]. Expensive facts (binary location, repository identity,
/// email, hooks path) are computed lazily and cached for the lifetime of the
/// value; build a new `Repository` to observe fresh state.
pub struct Repository {
	working_dir: PathBuf,
	config: RepositoryConfig,
	locator: GitLocator,
	runner: Arc<dyn GitRunner>,
	terminal: Arc<dyn Terminal>,
	pub(crate) cache: RepoCache,
}

/// Builder for [`Repository`].
pub struct RepositoryBuilder {
	working_dir: PathBuf,
	config: RepositoryConfig,
	git_binary_path: Option<PathBuf>,
	locator: Option<GitLocator>,
	runner: Option<Arc<dyn GitRunner>>,
	terminal: Option<Arc<dyn Terminal>>,
}

impl RepositoryBuilder {
	/// Explicit git executable; skips the `PATH` search.
	pub fn git_binary_path(mut self, path: Option<PathBuf>) -> Self {
		self.git_binary_path = path;
		self
	}

	/// Replaces the default locator entirely. Takes precedence over
	/// [`Self::git_binary_path`].
	pub fn locator(mut self, locator: GitLocator) -> Self {
		self.locator = Some(locator);
		self
	}

	pub fn runner(mut self, runner: Arc<dyn GitRunner>) -> Self {
		self.runner = Some(runner);
		self
	}

	pub fn terminal(mut self, terminal: Arc<dyn Terminal>) -> Self {
		self.terminal = Some(terminal);
		self
	}

	pub fn build(self) -> Repository {
		let locator = self
			.locator
			.unwrap_or_else(|| GitLocator::new(self.git_binary_path));

		Repository {
			working_dir: self.working_dir,
			config: self.config,
			locator,
			runner: self
				.runner
				.unwrap_or_else(|| Arc::new(ProcessGitRunner::new())),
			terminal: self
				.terminal
				.unwrap_or_else(|| Arc::new(ConsoleTerminal)),
			cache: RepoCache::default(),
		}
	}
}

impl Repository {
	pub fn builder(working_dir: impl Into<PathBuf>, config: RepositoryConfig) -> RepositoryBuilder {
		RepositoryBuilder {
			working_dir: working_dir.into(),
			config,
			git_binary_path: None,
			locator: None,
			runner: None,
			terminal: None,
		}
	}

	/// Directory git commands run in.
	pub fn working_dir(&self) -> &Path {
		&self.working_dir
	}

	pub fn config(&self) -> &RepositoryConfig {
		&self.config
	}

	pub fn terminal(&self) -> &dyn Terminal {
		self.terminal.as_ref()
	}

	/// Path to the git executable, or `None` when git is not installed.
	pub fn git_path(&self) -> Option<&Path> {
		self.locator.resolve()
	}

	pub fn require_git_path(&self) -> Result<&Path, GitError> {
		self.locator.require()
	}

	/// Version reported by `git version`.
	pub fn git_version(&self) -> Result<GitVersion, GitError> {
		let git = self.require_git_path()?;
		let output = self.runner.run(git, &["version"], &self.working_dir)?;
		GitVersion::parse(&output)
	}

	/// Fails with [`GitError::VersionTooOld`] when the installed git predates
	/// [`MINIMUM_GIT_VERSION`].
	pub fn ensure_minimum_git_version(&self) -> Result<GitVersion, GitError> {
		let found = self.git_version()?;
		if found.is_supported() {
			Ok(found)
		} else {
			Err(GitError::VersionTooOld {
				found,
				minimum: MINIMUM_GIT_VERSION,
			})
		}
	}

	/// Runs `git <args>` in the working directory.
	pub(crate) fn exec(&self, args: &[&str]) -> Result<String, GitError> {
		self.exec_in(args, &self.working_dir)
	}

	/// Runs `git <args>` in `cwd`. On failure the installed version is checked
	/// so an outdated git gets a clear diagnostic; the original error is
	/// returned either way.
	pub(crate) fn exec_in(&self, args: &[&str], cwd: &Path) -> Result<String, GitError> {
		let git = self.require_git_path()?;
		self.runner.run(git, args, cwd).map_err(|err| {
			self.report_outdated_git();
			err
		})
	}

	/// Runs `git <args>` without the version diagnostic, for queries whose
	/// failure is an expected answer.
	pub(crate) fn exec_quiet(&self, args: &[&str]) -> Result<String, GitError> {
		let git = self.require_git_path()?;
		self.runner.run(git, args, &self.working_dir)
	}

	/// Runs `git <args>` with stdio discarded; `Ok(false)` on non-zero exit.
	pub(crate) fn exec_silent(&self, args: &[&str]) -> Result<bool, GitError> {
		let git = self.require_git_path()?;
		self.runner.run_silent(git, args, &self.working_dir)
	}

	/// Reads a single `git config` value. An unset key is `Ok(None)`, not an
	/// error.
	pub(crate) fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
		match self.exec_quiet(&["config", key]) {
			Ok(output) => {
				let value = output.trim();
				Ok((!value.is_empty()).then(|| value.to_string()))
			}
			Err(err) if err.exit_code() == Some(CONFIG_KEY_NOT_FOUND) => {
				tracing::debug!(key, "git config key is not set");
				Ok(None)
			}
			Err(err) => {
				self.report_outdated_git();
				Err(err)
			}
		}
	}

	fn report_outdated_git(&self) {
		match self.ensure_minimum_git_version() {
			Ok(version) => {
				tracing::trace!(version = %version, "git version is supported");
			}
			Err(err @ GitError::VersionTooOld { .. }) => {
				tracing::error!(error = %err, "installed git is too old");
				self.terminal.write_error_line(&format!(
					"{err}. Please upgrade git and try again."
				));
			}
			Err(err) => {
				tracing::debug!(error = %err, "unable to check git version");
			}
		}
	}
}

impl fmt::Debug for Repository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Repository")
			.field("working_dir", &self.working_dir)
			.field("config", &self.config)
			.field("locator", &self.locator)
			.field("cache", &self.cache)
			.finish()
	}
}


#[cfg(test)]
mod tests {
	use super::test_support::*;
	use super::*;
	use crate::mock_runner::MockGitRunner;

	/// Test: a failing command on an outdated git prints the version
	/// diagnostic but still returns the original error.
	///
	/// Why this test is important: the diagnostic is advisory. Callers match
	/// on the real failure, so swapping it for a version error would break
	/// their handling.
	#[test]
	fn test_failure_on_old_git_reports_version_and_keeps_error() {
		let runner = MockGitRunner::new()
			.with_failure("remote", 129, "error: unknown option")
			.with_output("version", "git version 1.9.5\n");
		let (repo, terminal) = mock_repository(&runner, RepositoryConfig::default());

		let err = repo.exec(&["remote"]).unwrap_err();
		assert_eq!(err.exit_code(), Some(129));

		let errors = terminal.errors();
		assert_eq!(errors.len(), 1);
		assert!(errors[0].contains("1.9.5"));
		assert!(errors[0].contains("2.20.0"));
	}

	#[test]
	fn test_failure_on_supported_git_is_silent() {
		let runner = MockGitRunner::new()
			.with_failure("remote", 128, "fatal: not a git repository")
			.with_output("version", "git version 2.43.0\n");
		let (repo, terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert!(repo.exec(&["remote"]).is_err());
		assert!(terminal.lines().is_empty());
		assert_eq!(runner.call_count("version"), 1);
	}

	#[test]
	fn test_success_skips_version_check() {
		let runner = MockGitRunner::new().with_output("remote", "origin\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert_eq!(repo.exec(&["remote"]).unwrap(), "origin\n");
		assert_eq!(runner.call_count("version"), 0);
	}

	#[test]
	fn test_config_value_unset_is_none() {
		let runner = MockGitRunner::new()
			.with_failure("config core.hooksPath", 1, "")
			.with_output("config user.name", "Test User\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert_eq!(repo.config_value("core.hooksPath").unwrap(), None);
		assert_eq!(
			repo.config_value("user.name").unwrap(),
			Some("Test User".to_string())
		);
		assert_eq!(runner.call_count("version"), 0);
	}

	#[test]
	fn test_config_value_other_failure_is_error() {
		let runner = MockGitRunner::new()
			.with_failure("config user.email", 3, "error: invalid config file")
			.with_output("version", "git version 2.43.0\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		let err = repo.config_value("user.email").unwrap_err();
		assert_eq!(err.exit_code(), Some(3));
	}

	#[test]
	fn test_missing_git_fails_every_command() {
		let runner = MockGitRunner::new();
		let repo = Repository::builder(WORKDIR, RepositoryConfig::default())
			.locator(GitLocator::with_search(None, || None))
			.runner(Arc::new(runner.clone()))
			.build();

		assert!(repo.git_path().is_none());
		assert!(matches!(repo.exec(&["remote"]), Err(GitError::GitNotFound)));
		assert!(matches!(repo.git_version(), Err(GitError::GitNotFound)));
		assert!(runner.get_calls().is_empty());
	}
}
