// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keel CLI - repository introspection for the Keel build orchestrator.
//!
//! Loads layered configuration, builds one [`Repository`] for the working
//! directory and prints the answer to a single query.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keel_cli_config::{
	load_config_with_cli,
	runtime::{LogFormat, LogLevel, LoggingConfig},
	sources::CliOverrides,
	KeelConfig,
};
use keel_cli_git::{normalize_git_url_for_comparison, GitError, Repository};

/// Keel - git repository introspection for monorepo builds
#[derive(Parser, Debug)]
#[command(name = "keel", version, about, long_about = None)]
struct Args {
	/// Run as if started in this directory
	#[arg(short = 'C', long = "cwd")]
	cwd: Option<PathBuf>,

	/// Path to a configuration file, used instead of <cwd>/keel.toml
	#[arg(long)]
	config: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(long)]
	log_level: Option<String>,

	/// Log format: pretty, compact or json (overrides config)
	#[arg(long)]
	log_format: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the working tree identity as JSON
	Info,
	/// Print the baseline branch changes are compared against
	Baseline,
	/// Print the merge base of HEAD and the target branch
	MergeBase {
		/// Branch to compare against (defaults to the baseline branch)
		#[arg(long)]
		target: Option<String>,
		/// Fetch the target branch first
		#[arg(long)]
		fetch: bool,
	},
	/// List files added on this branch relative to the target branch
	Changed {
		/// Branch to compare against (defaults to the baseline branch)
		#[arg(long)]
		target: Option<String>,
		/// Use local refs without fetching
		#[arg(long)]
		skip_fetch: bool,
		/// Only list paths under this prefix
		#[arg(long)]
		prefix: Option<String>,
	},
	/// List untracked and modified files
	Uncommitted {
		/// Print nothing; exit with status 1 when there are changes
		#[arg(long, short)]
		quiet: bool,
	},
	/// Show where hooks are installed and whether core.hooksPath redirects them
	Hooks,
	/// Print the configured git email
	Email,
	/// Print the comparison form of a remote URL
	NormalizeUrl {
		url: String,
	},
	/// Print a blob, e.g. `HEAD:package.json`
	Blob {
		spec: String,
		/// Directory to run in (defaults to the repository root)
		#[arg(long)]
		root: Option<PathBuf>,
	},
	/// Print the Keel and git versions
	Version,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			workspace: args.cwd.clone(),
			config_file: args.config.clone(),
			log_level: args.log_level.clone(),
			log_format: args.log_format.clone(),
		}
	}
}

fn log_level_to_tracing(level: LogLevel) -> tracing::Level {
	match level {
		LogLevel::Trace => tracing::Level::TRACE,
		LogLevel::Debug => tracing::Level::DEBUG,
		LogLevel::Info => tracing::Level::INFO,
		LogLevel::Warn => tracing::Level::WARN,
		LogLevel::Error => tracing::Level::ERROR,
	}
}

/// Logs go to stderr; stdout carries command output.
fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("keel={}", log_level_to_tracing(logging.level))));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn build_repository(args: &Args, config: &KeelConfig) -> Result<Repository> {
	let working_dir = match &args.cwd {
		Some(dir) => dir.clone(),
		None => std::env::current_dir().context("failed to read current directory")?,
	};

	Ok(
		Repository::builder(working_dir, config.repository.clone())
			.git_binary_path(config.git.binary_path.clone())
			.build(),
	)
}

fn print_lines(lines: &[String]) {
	for line in lines {
		println!("{line}");
	}
}

fn run(args: Args) -> Result<ExitCode> {
	// Pure; needs neither configuration nor git.
	if let Command::NormalizeUrl { url } = &args.command {
		println!("{}", normalize_git_url_for_comparison(url));
		return Ok(ExitCode::SUCCESS);
	}

	let config = load_config_with_cli(CliOverrides::from(&args))
		.context("failed to load configuration")?;

	init_tracing(&config.logging);
	// Sources were loaded before a subscriber existed.
	for warning in &config.load_warnings {
		warn!(warning = %warning, "configuration source skipped");
	}

	let repo = build_repository(&args, &config)?;
	info!(working_dir = %repo.working_dir().display(), command = ?args.command, "starting keel");

	match &args.command {
		Command::NormalizeUrl { .. } => {}
		Command::Info => {
			let info = repo.repo_info().map(|info| {
				serde_json::json!({
					"sha": info.sha,
					"root": info.root,
					"commonGitDir": info.common_git_dir,
					"worktreeGitDir": info.worktree_git_dir,
				})
			});
			let output = serde_json::json!({
				"isWorkingTree": info.is_some(),
				"repository": info,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		Command::Baseline => {
			println!("{}", repo.remote_default_branch()?);
		}
		Command::MergeBase { target, fetch } => {
			let target = resolve_target(&repo, target.as_deref())?;
			println!("{}", repo.merge_base(&target, *fetch)?);
		}
		Command::Changed {
			target,
			skip_fetch,
			prefix,
		} => {
			let target = resolve_target(&repo, target.as_deref())?;
			let files = repo.changed_files(&target, *skip_fetch, prefix.as_deref())?;
			print_lines(&files);
		}
		Command::Uncommitted { quiet } => {
			let changes = repo.uncommitted_changes()?;
			if *quiet {
				debug!(count = changes.len(), "uncommitted changes");
				return Ok(if changes.is_empty() {
					ExitCode::SUCCESS
				} else {
					ExitCode::FAILURE
				});
			}
			print_lines(&changes);
		}
		Command::Hooks => {
			let folder = repo
				.hooks_folder()
				.context("not inside a git working tree")?;
			println!("folder:     {}", folder.display());
			println!("default:    {}", repo.is_hooks_path_default()?);
			let configured = repo.config_hooks_path()?;
			println!(
				"configured: {}",
				if configured.is_empty() {
					"(unset)"
				} else {
					configured.as_str()
				}
			);
		}
		Command::Email => {
			println!("{}", repo.email()?);
		}
		Command::Blob { spec, root } => {
			let root = match root {
				Some(root) => root.clone(),
				None => repo
					.repository_root()
					.map(|root| root.to_path_buf())
					.unwrap_or_else(|| repo.working_dir().to_path_buf()),
			};
			print!("{}", repo.blob_content(spec, &root)?);
		}
		Command::Version => {
			println!("keel {}", env!("CARGO_PKG_VERSION"));
			match repo.git_version() {
				Ok(version) => println!("git {version}"),
				Err(e) => println!("git unavailable: {e}"),
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn resolve_target(repo: &Repository, target: Option<&str>) -> Result<String, GitError> {
	match target {
		Some(target) => Ok(target.to_string()),
		None => repo.remote_default_branch(),
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	match run(args) {
		Ok(code) => code,
		Err(err) => {
			// Already explained on the terminal.
			if err
				.downcast_ref::<GitError>()
				.is_some_and(GitError::is_already_reported)
			{
				return ExitCode::FAILURE;
			}
			eprintln!("error: {err:#}");
			ExitCode::FAILURE
		}
	}
}
