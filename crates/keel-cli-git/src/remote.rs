// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashSet;

use keel_cli_config::DEFAULT_TAG_SEPARATOR;

use crate::error::GitError;
use crate::normalize::normalize_git_url_for_comparison;
use crate::repository::Repository;

/// Comparison key for a remote URL. Empty keys never match.
fn comparison_key(url: &str) -> String {
	normalize_git_url_for_comparison(url).to_uppercase()
}

impl Repository {
	/// Branch that changes are compared against, as `<remote>/<branch>`.
	///
	/// The remote is the first local remote whose URL matches one of the
	/// configured repository URLs; the branch is the configured default
	/// branch. When nothing matches, the configured default
	/// `<remote>/<branch>` is used and a warning explains why.
	pub fn remote_default_branch(&self) -> Result<String, GitError> {
		let config = self.config();
		let fallback = config.default_fully_qualified_remote_branch();

		if config.urls.is_empty() {
			self.terminal().write_warning_line(
				"A git remote URL has not been specified in the repository configuration. \
				 Setting the baseline remote URL is recommended.",
			);
			return Ok(fallback);
		}

		let wanted: HashSet<String> = config
			.urls
			.iter()
			.map(|url| comparison_key(url))
			.filter(|key| !key.is_empty())
			.collect();

		let matching = self.matching_remotes(&wanted)?;

		let Some(first) = matching.first() else {
			let message = match config.urls.as_slice() {
				[url] => format!(
					"Unable to find a git remote matching the repository URL ({url}). Detected \
					 changes are likely to be incorrect."
				),
				urls => format!(
					"Unable to find a git remote matching one of the repository URLs ({}). \
					 Detected changes are likely to be incorrect.",
					urls.join(", ")
				),
			};
			self.terminal().write_warning_line(&message);
			tracing::debug!(fallback = %fallback, "no remote matches the configured repository URL");
			return Ok(fallback);
		};

		if matching.len() > 1 {
			self.terminal().write_warning_line(&format!(
				"More than one git remote matches the repository URL. Using the first remote \
				 ({first})."
			));
		}

		let branch = format!("{first}/{}", config.default_branch);
		tracing::debug!(remote = %first, branch = %branch, "resolved remote default branch");
		Ok(branch)
	}

	/// Separator between a package name and its version in release tags.
	pub fn tag_separator(&self) -> &str {
		let separator = self.config().tag_separator.as_str();
		if separator.is_empty() {
			DEFAULT_TAG_SEPARATOR
		} else {
			separator
		}
	}

	/// Names of local remotes whose URL key is in `wanted`, in the order
	/// `git remote` lists them.
	fn matching_remotes(&self, wanted: &HashSet<String>) -> Result<Vec<String>, GitError> {
		let remotes = self.exec(&["remote"])?;
		let mut matching = Vec::new();

		for remote in remotes.lines().map(str::trim).filter(|r| !r.is_empty()) {
			let url = self.exec(&["remote", "get-url", remote])?;
			let url = url.trim();
			if url.is_empty() {
				continue;
			}

			let key = comparison_key(url);
			tracing::trace!(remote, url, key = %key, "comparing remote URL");
			if !key.is_empty() && wanted.contains(&key) {
				matching.push(remote.to_string());
			}
		}

		Ok(matching)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock_runner::MockGitRunner;
	use crate::repository::test_support::*;
	use keel_cli_config::RepositoryConfig;

	fn config_with_urls(urls: &[&str]) -> RepositoryConfig {
		RepositoryConfig {
			urls: urls.iter().map(|u| u.to_string()).collect(),
			default_branch: "develop".to_string(),
			..Default::default()
		}
	}

	fn two_remotes() -> MockGitRunner {
		MockGitRunner::new()
			.with_output("remote", "origin\nupstream\n")
			.with_output("remote get-url origin", "git@github.com:org/repo.git\n")
			.with_output("remote get-url upstream", "https://example.com/other.git\n")
	}

	/// Test: an SCP-style remote matches an https repository URL.
	///
	/// Why this test is important: contributors clone with whatever dialect
	/// they prefer. A mismatch here silently compares against the wrong
	/// branch and selects the wrong set of projects to build.
	#[test]
	fn test_matches_remote_across_url_dialects() {
		let runner = two_remotes();
		let (repo, terminal) =
			mock_repository(&runner, config_with_urls(&["https://github.com/org/repo"]));

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
		assert!(terminal.warnings().is_empty());
	}

	#[test]
	fn test_match_is_case_insensitive() {
		let runner = two_remotes();
		let (repo, _terminal) =
			mock_repository(&runner, config_with_urls(&["HTTPS://GitHub.com/ORG/Repo.git"]));

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
	}

	#[test]
	fn test_no_urls_falls_back_with_warning() {
		let runner = MockGitRunner::new();
		let (repo, terminal) = mock_repository(&runner, config_with_urls(&[]));

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
		assert!(terminal.warnings()[0].contains("has not been specified"));
		assert!(runner.get_calls().is_empty());
	}

	#[test]
	fn test_no_match_with_single_url() {
		let runner = two_remotes();
		let (repo, terminal) =
			mock_repository(&runner, config_with_urls(&["https://github.com/org/missing"]));

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
		assert_eq!(
			terminal.warnings(),
			vec![
				"Unable to find a git remote matching the repository URL \
				 (https://github.com/org/missing). Detected changes are likely to be incorrect."
			]
		);
	}

	#[test]
	fn test_no_match_with_several_urls() {
		let runner = two_remotes();
		let (repo, terminal) = mock_repository(
			&runner,
			config_with_urls(&["https://a.example/x", "https://b.example/y"]),
		);

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
		let warning = &terminal.warnings()[0];
		assert!(warning.contains("one of the repository URLs"));
		assert!(warning.contains("(https://a.example/x, https://b.example/y)"));
	}

	#[test]
	fn test_multiple_matches_pick_first_in_git_order() {
		let runner = MockGitRunner::new()
			.with_output("remote", "fork\norigin\n")
			.with_output("remote get-url fork", "ssh://git@github.com/org/repo.git\n")
			.with_output("remote get-url origin", "https://github.com/org/repo\n");
		let (repo, terminal) =
			mock_repository(&runner, config_with_urls(&["git@github.com:org/repo"]));

		assert_eq!(repo.remote_default_branch().unwrap(), "fork/develop");
		assert_eq!(
			terminal.warnings(),
			vec!["More than one git remote matches the repository URL. Using the first remote (fork)."]
		);
	}

	#[test]
	fn test_remote_without_url_is_skipped() {
		let runner = MockGitRunner::new()
			.with_output("remote", "empty\norigin\n")
			.with_output("remote get-url empty", "\n")
			.with_output("remote get-url origin", "https://github.com/org/repo.git\n");
		let (repo, terminal) =
			mock_repository(&runner, config_with_urls(&["https://github.com/org/repo"]));

		assert_eq!(repo.remote_default_branch().unwrap(), "origin/develop");
		assert!(terminal.warnings().is_empty());
	}

	#[test]
	fn test_listing_remotes_failure_propagates() {
		let runner = MockGitRunner::new()
			.with_failure("remote", 128, "fatal: not a git repository")
			.with_output("version", "git version 2.43.0\n");
		let (repo, _terminal) =
			mock_repository(&runner, config_with_urls(&["https://github.com/org/repo"]));

		let err = repo.remote_default_branch().unwrap_err();
		assert_eq!(err.exit_code(), Some(128));
	}

	#[test]
	fn test_tag_separator() {
		let runner = MockGitRunner::new();
		let (repo, _terminal) = mock_repository(&runner, RepositoryConfig::default());
		assert_eq!(repo.tag_separator(), "_");

		let config = RepositoryConfig {
			tag_separator: "@".to_string(),
			..Default::default()
		};
		let (repo, _terminal) = mock_repository(&runner, config);
		assert_eq!(repo.tag_separator(), "@");

		let config = RepositoryConfig {
			tag_separator: String::new(),
			..Default::default()
		};
		let (repo, _terminal) = mock_repository(&runner, config);
		assert_eq!(repo.tag_separator(), "_");
	}
}
