// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Component, Path, PathBuf};

use crate::error::GitError;
use crate::repository::Repository;

/// Identity of the working tree a [`Repository`] points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
	/// Full SHA of `HEAD`.
	pub sha: String,
	/// Top-level directory of the working tree.
	pub root: PathBuf,
	/// Directory shared by all worktrees (`.git` of the main checkout).
	pub common_git_dir: Option<PathBuf>,
	/// Git directory of this particular worktree.
	pub worktree_git_dir: Option<PathBuf>,
}

/// What `rev-parse` reported before validation. A directory that is not a
/// usable working tree can still produce a root and git dirs, so the SHA
/// decides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RawRepoInfo {
	sha: Option<String>,
	root: PathBuf,
	common_git_dir: Option<PathBuf>,
	worktree_git_dir: Option<PathBuf>,
}

impl RawRepoInfo {
	fn into_repo_info(self) -> Option<RepoInfo> {
		let sha = self.sha.filter(|sha| !sha.is_empty())?;
		Some(RepoInfo {
			sha,
			root: self.root,
			common_git_dir: self.common_git_dir,
			worktree_git_dir: self.worktree_git_dir,
		})
	}
}

const LAYOUT_ARGS: &[&str] = &[
	"rev-parse",
	"--show-toplevel",
	"--absolute-git-dir",
	"--git-common-dir",
];

impl Repository {
	/// Identity of the enclosing working tree, or `None` when the working
	/// directory is not inside one (or `HEAD` has no commit yet).
	///
	/// Queried once; later calls return the cached answer, including `None`.
	pub fn repo_info(&self) -> Option<&RepoInfo> {
		self.cache
			.repo_info
			.get_or_init(|| {
				let info = self.query_repo_info();
				match &info {
					Some(info) => tracing::debug!(
							root = %info.root.display(),
							sha = %info.sha,
							"detected git working tree"
					),
					None => tracing::debug!(
							path = %self.working_dir().display(),
							"not a git working tree"
					),
				}
				info
			})
			.as_ref()
	}

	pub fn require_repo_info(&self) -> Result<&RepoInfo, GitError> {
		self.repo_info()
			.ok_or_else(|| GitError::NotAGitRepo(self.working_dir().display().to_string()))
	}

	pub fn is_path_under_git_working_tree(&self) -> bool {
		self.repo_info().is_some()
	}

	pub fn repository_root(&self) -> Option<&Path> {
		self.repo_info().map(|info| info.root.as_path())
	}

	fn query_repo_info(&self) -> Option<RepoInfo> {
		let layout = match self.exec_quiet(LAYOUT_ARGS) {
			Ok(layout) => layout,
			Err(e) => {
				tracing::trace!(error = %e, "rev-parse layout query failed");
				return None;
			}
		};

		let mut raw = parse_layout(&layout, self.working_dir())?;
		raw.sha = self
			.exec_quiet(&["rev-parse", "--verify", "HEAD"])
			.ok()
			.map(|sha| sha.trim().to_string());

		raw.into_repo_info()
	}
}

/// Parses the three lines printed for [`LAYOUT_ARGS`]: top-level, absolute
/// git dir, common git dir. `--git-common-dir` may be relative to `cwd`.
fn parse_layout(output: &str, cwd: &Path) -> Option<RawRepoInfo> {
	let mut lines = output.lines().map(str::trim);

	let root = lines.next().filter(|l| !l.is_empty())?;
	let worktree_git_dir = lines.next().filter(|l| !l.is_empty()).map(PathBuf::from);
	let common_git_dir = lines
		.next()
		.filter(|l| !l.is_empty())
		.map(|dir| resolve_against(cwd, dir));

	Some(RawRepoInfo {
		sha: None,
		root: PathBuf::from(root),
		common_git_dir,
		worktree_git_dir,
	})
}

/// Joins a relative `path` onto `base` and folds `.` and `..` lexically, so
/// `/repo/sub` + `../.git` is `/repo/.git`. Symlinks are not resolved.
pub(crate) fn resolve_against(base: &Path, path: &str) -> PathBuf {
	let joined = base.join(path);
	let mut resolved = PathBuf::new();

	for component in joined.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => match resolved.components().next_back() {
				Some(Component::Normal(_)) => {
					resolved.pop();
				}
				// `..` at the root stays at the root.
				Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
				_ => resolved.push(".."),
			},
			other => resolved.push(other.as_os_str()),
		}
	}

	resolved
}
