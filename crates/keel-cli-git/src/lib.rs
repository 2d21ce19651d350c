// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Repository introspection for the Keel build orchestrator.
//!
//! A [`Repository`] answers questions about one git working tree by running
//! the installed git binary: which files changed against the baseline
//! branch, whether the tree is dirty, which remote is the baseline, where
//! hooks live and what the configured email is. Expensive answers are cached
//! per `Repository` value.

mod changes;
mod email;
mod error;
mod hooks;
mod locate;
mod mock_runner;
mod normalize;
mod outcome;
mod remote;
mod repo_info;
mod repository;
mod runner;
mod terminal;
mod version;

pub use email::email_example_lines;
pub use error::GitError;
pub use locate::GitLocator;
pub use mock_runner::{MockCall, MockGitRunner};
pub use normalize::normalize_git_url_for_comparison;
pub use outcome::ResultOrError;
pub use repo_info::RepoInfo;
pub use repository::{Repository, RepositoryBuilder};
pub use runner::{GitRunner, ProcessGitRunner};
pub use terminal::{ConsoleTerminal, LineKind, RecordingTerminal, Terminal, TerminalLine};
pub use version::{GitVersion, MINIMUM_GIT_VERSION};
