// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Component, Path, PathBuf};

use crate::error::GitError;
use crate::repository::Repository;

impl Repository {
	/// Most recent common ancestor of `HEAD` and `target_branch`.
	///
	/// With `fetch_first`, the remote branch is fetched beforehand on a
	/// best-effort basis. A failed lookup (typically a shallow clone) is
	/// explained on the terminal and returned as
	/// [`GitError::AlreadyReported`].
	pub fn merge_base(&self, target_branch: &str, fetch_first: bool) -> Result<String, GitError> {
		if fetch_first {
			self.fetch_remote_branch(target_branch);
		}

		self.require_git_path()?;
		match self.exec(&[
			"--no-optional-locks",
			"merge-base",
			"HEAD",
			target_branch,
			"--",
		]) {
			Ok(output) => {
				let merge_base = output.trim().to_string();
				tracing::debug!(target_branch, merge_base = %merge_base, "resolved merge base");
				Ok(merge_base)
			}
			Err(err) => {
				tracing::debug!(target_branch, error = %err, "merge-base failed");
				self.terminal().write_error_line(&format!(
					"Unable to determine merge base for branch \"{target_branch}\". This can occur if \
					 the current clone is a shallow clone. If this clone is running in a CI pipeline, \
					 check your pipeline settings to ensure that the clone depth includes the \
					 expected merge base. If this clone is running locally, consider running \"git -C \
					 \"{}\" fetch --deepen=<depth>\".",
					self.working_dir().display()
				));
				Err(GitError::AlreadyReported)
			}
		}
	}

	/// Files added on this branch relative to its merge base with
	/// `target_branch`, as repository-root-relative paths.
	///
	/// Renames are reported as additions. With `path_prefix`, only paths at or
	/// under the prefix are kept, in their original order.
	pub fn changed_files(
		&self,
		target_branch: &str,
		skip_fetch: bool,
		path_prefix: Option<&str>,
	) -> Result<Vec<String>, GitError> {
		if !skip_fetch {
			self.fetch_remote_branch(target_branch);
		}

		let range = format!("{target_branch}...");
		let output = self.exec(&[
			"diff",
			&range,
			"--name-only",
			"--no-renames",
			"--diff-filter=A",
		])?;

		let files: Vec<String> = split_lines(&output)
			.filter(|file| path_prefix.map_or(true, |prefix| is_under_or_equal(file, prefix)))
			.map(str::to_string)
			.collect();

		tracing::debug!(
				target_branch,
				path_prefix = ?path_prefix,
				files_count = files.len(),
				"listed changed files"
		);
		Ok(files)
	}

	pub fn has_uncommitted_changes(&self) -> Result<bool, GitError> {
		Ok(!self.uncommitted_changes()?.is_empty())
	}

	/// Untracked files followed by files that differ from `HEAD` (staged or
	/// not). The two lists are concatenated as-is.
	pub fn uncommitted_changes(&self) -> Result<Vec<String>, GitError> {
		let untracked = self.exec(&["ls-files", "--exclude-standard", "--others"])?;
		let diff_on_head = self.exec(&["diff", "HEAD", "--name-only"])?;

		let changes: Vec<String> = split_lines(&untracked)
			.chain(split_lines(&diff_on_head))
			.map(str::to_string)
			.collect();

		tracing::debug!(files_count = changes.len(), "listed uncommitted changes");
		Ok(changes)
	}

	/// Contents of `blob_spec` (e.g. `HEAD:path/to/file`), read in
	/// `repository_root`.
	pub fn blob_content(&self, blob_spec: &str, repository_root: &Path) -> Result<String, GitError> {
		self.exec_in(&["cat-file", "blob", blob_spec, "--"], repository_root)
	}

	/// Fetches `<remote>/<branch>`. Never fails: problems become warnings
	/// and the caller continues with whatever refs exist locally.
	fn fetch_remote_branch(&self, remote_branch: &str) {
		self.terminal()
			.write_line(&format!("Checking for updates to {remote_branch}..."));

		let Some((remote, branch)) = remote_branch.split_once('/') else {
			self.terminal().write_warning_line(&format!(
				"Unexpected git remote branch format: {remote_branch}. Expected branch to be in the \
				 <remote>/<branch name> format. Skipping fetch."
			));
			return;
		};

		let fetched = match self.exec_silent(&["fetch", remote, branch]) {
			Ok(success) => success,
			Err(e) => {
				tracing::debug!(error = %e, "fetch could not be started");
				false
			}
		};

		if fetched {
			tracing::debug!(remote, branch, "fetched remote branch");
		} else {
			tracing::debug!(remote, branch, "fetch failed");
			self.terminal().write_warning_line(&format!(
				"Error fetching git remote branch {remote_branch}. Detected changed files may be \
				 incorrect."
			));
		}
	}
}

/// Trimmed, non-empty lines of git output.
fn split_lines(output: &str) -> impl Iterator<Item = &str> {
	output.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Component-wise prefix test: `src/a.rs` is under `src` but not under `sr`.
/// `.` components are ignored, so `.`, `./` and an empty prefix all mean the
/// repository root and match every path.
fn is_under_or_equal(path: &str, prefix: &str) -> bool {
	let prefix: PathBuf = Path::new(prefix)
		.components()
		.filter(|component| !matches!(component, Component::CurDir))
		.collect();
	prefix.as_os_str().is_empty() || Path::new(path).starts_with(&prefix)
}
