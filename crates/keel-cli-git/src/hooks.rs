// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use crate::error::GitError;
use crate::repo_info::resolve_against;
use crate::repository::Repository;

impl Repository {
	/// `<worktree git dir>/hooks`, where hooks for this worktree belong.
	/// `None` outside a working tree.
	pub fn hooks_folder(&self) -> Option<PathBuf> {
		self.repo_info()?
			.worktree_git_dir
			.as_ref()
			.map(|dir| dir.join("hooks"))
	}

	/// Whether git still looks for hooks in `<common git dir>/hooks`, i.e.
	/// `core.hooksPath` does not redirect them elsewhere.
	///
	/// A failed lookup is reported on the terminal and answered with `true`
	/// so hook installation is not blocked.
	pub fn is_hooks_path_default(&self) -> Result<bool, GitError> {
		let info = self.require_repo_info()?;
		let Some(common_git_dir) = info.common_git_dir.as_ref() else {
			return Ok(true);
		};
		let default_path = common_git_dir.join("hooks");

		let outcome = self.cache.hooks_path.get_or_init(|| {
			self.exec(&["rev-parse", "--git-path", "hooks"])
				.map(|output| resolve_against(self.working_dir(), output.trim()))
				.into()
		});

		match outcome.as_result() {
			Ok(hooks_path) => {
				let is_default = *hooks_path == default_path;
				tracing::debug!(
						hooks_path = %hooks_path.display(),
						default_path = %default_path.display(),
						is_default,
						"compared hooks path"
				);
				Ok(is_default)
			}
			Err(err) => {
				self.terminal()
					.write_error_line(&format!("Error looking up hooks path: {err}"));
				Ok(true)
			}
		}
	}

	/// Raw `core.hooksPath` value, or an empty string when unset.
	pub fn config_hooks_path(&self) -> Result<String, GitError> {
		Ok(self.config_value("core.hooksPath")?.unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock_runner::MockGitRunner;
	use crate::repository::test_support::*;
	use keel_cli_config::RepositoryConfig;
	use std::path::Path;
	use std::process::Command;
	use tempfile::TempDir;

	const LAYOUT: &str = "rev-parse --show-toplevel --absolute-git-dir --git-common-dir";
	const HOOKS: &str = "rev-parse --git-path hooks";

	fn repo_runner() -> MockGitRunner {
		MockGitRunner::new()
			.with_output(LAYOUT, "/work/repo\n/work/repo/.git\n.git\n")
			.with_output("rev-parse --verify HEAD", "0123456789abcdef\n")
	}

	#[test]
	fn test_hooks_folder() {
		let runner = repo_runner();
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());
		assert_eq!(
			repo.hooks_folder(),
			Some(PathBuf::from("/work/repo/.git/hooks"))
		);
	}

	#[test]
	fn test_hooks_folder_outside_working_tree() {
		let runner = MockGitRunner::new();
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());
		assert_eq!(repo.hooks_folder(), None);
		assert!(matches!(
			repo.is_hooks_path_default(),
			Err(GitError::NotAGitRepo(_))
		));
	}

	#[test]
	fn test_default_hooks_path() {
		let runner = repo_runner().with_output(HOOKS, ".git/hooks\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert!(repo.is_hooks_path_default().unwrap());
		assert!(repo.is_hooks_path_default().unwrap());
		assert_eq!(runner.call_count(HOOKS), 1);
	}

	/// Test: from a subdirectory git reports `..`-relative paths; an absolute
	/// `core.hooksPath` naming the default folder still counts as default.
	#[test]
	fn test_default_hooks_path_from_subdirectory() {
		let runner = MockGitRunner::new()
			.with_output(LAYOUT, "/work\n/work/.git\n../.git\n")
			.with_output("rev-parse --verify HEAD", "0123456789abcdef\n")
			.with_output(HOOKS, "/work/.git/hooks\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert_eq!(
			repo.repo_info().unwrap().common_git_dir,
			Some(PathBuf::from("/work/.git"))
		);
		assert!(repo.is_hooks_path_default().unwrap());
	}

	#[test]
	fn test_relative_default_hooks_path_from_subdirectory() {
		let runner = MockGitRunner::new()
			.with_output(LAYOUT, "/work\n/work/.git\n../.git\n")
			.with_output("rev-parse --verify HEAD", "0123456789abcdef\n")
			.with_output(HOOKS, "../.git/hooks\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert!(repo.is_hooks_path_default().unwrap());
	}

	#[test]
	fn test_redirected_hooks_path() {
		let runner = repo_runner().with_output(HOOKS, "/work/repo/.husky\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert!(!repo.is_hooks_path_default().unwrap());
	}

	/// Test: a failed lookup answers "default" and is not retried.
	///
	/// Why this test is important: hook installation must not be blocked by
	/// an unreadable config, and the failing subcommand should only run once.
	#[test]
	fn test_lookup_failure_fails_open() {
		let runner = repo_runner()
			.with_failure(HOOKS, 128, "fatal: bad config")
			.with_output("version", "git version 2.43.0\n");
		let (repo, terminal) = mock_repository(&runner, RepositoryConfig::default());

		assert!(repo.is_hooks_path_default().unwrap());
		assert!(repo.is_hooks_path_default().unwrap());
		assert_eq!(runner.call_count(HOOKS), 1);

		let errors = terminal.errors();
		assert!(errors[0].starts_with("Error looking up hooks path:"));
		assert!(errors[0].contains("fatal: bad config"));
	}

	#[test]
	fn test_config_hooks_path() {
		let runner = MockGitRunner::new().with_failure("config core.hooksPath", 1, "");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());
		assert_eq!(repo.config_hooks_path().unwrap(), "");

		let runner = MockGitRunner::new().with_output("config core.hooksPath", ".husky\n");
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());
		assert_eq!(repo.config_hooks_path().unwrap(), ".husky");
	}

	fn git(dir: &Path, args: &[&str]) {
		let status = Command::new("git")
			.args(args)
			.current_dir(dir)
			.status()
			.expect("git failed to start");
		assert!(status.success(), "git {args:?} failed");
	}

	fn init_repo_with_commit(dir: &Path) {
		git(dir, &["init", "--quiet"]);
		git(dir, &["config", "user.email", "test@test.com"]);
		git(dir, &["config", "user.name", "Test"]);
		std::fs::write(dir.join("README.md"), "# Test").unwrap();
		git(dir, &["add", "."]);
		git(dir, &["commit", "--quiet", "-m", "Initial commit"]);
	}

	#[test]
	fn test_real_hooks_path() {
		let temp = TempDir::new().unwrap();
		init_repo_with_commit(temp.path());

		let repo = Repository::builder(temp.path(), RepositoryConfig::default()).build();
		assert!(repo.is_hooks_path_default().unwrap());
		assert_eq!(repo.config_hooks_path().unwrap(), "");
		assert!(repo.hooks_folder().unwrap().ends_with(".git/hooks"));

		git(temp.path(), &["config", "core.hooksPath", ".husky"]);

		// Fresh value; the first one keeps its cached answer.
		let repo = Repository::builder(temp.path(), RepositoryConfig::default()).build();
		assert!(!repo.is_hooks_path_default().unwrap());
		assert_eq!(repo.config_hooks_path().unwrap(), ".husky");
	}
}
