// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::error::GitError;
use crate::outcome::ResultOrError;
use crate::repository::Repository;

const FALLBACK_SAMPLE_EMAIL: &str = "mr-example@contoso.com";

/// Commands that set a local identity, using `sample_email` when the
/// repository configuration provides one.
pub fn email_example_lines(sample_email: Option<&str>) -> Vec<String> {
	let sample = sample_email
		.filter(|email| !email.trim().is_empty())
		.unwrap_or(FALLBACK_SAMPLE_EMAIL);
	vec![
		r#"    git config --local user.name "Mr. Example""#.to_string(),
		format!(r#"    git config --local user.email "{sample}""#),
	]
}

impl Repository {
	/// Configured `user.email`, or `None` when unset, empty or unreadable.
	pub fn try_email(&self) -> Option<String> {
		self.email_outcome().value().cloned().flatten()
	}

	/// Configured `user.email`.
	///
	/// When the email is missing or cannot be read, instructions are written
	/// to the terminal and [`GitError::AlreadyReported`] is returned so the
	/// caller can stop without printing the failure again.
	pub fn email(&self) -> Result<String, GitError> {
		self.require_git_path()?;

		match self.email_outcome().as_result() {
			Ok(Some(email)) => Ok(email.clone()),
			Ok(None) => {
				let terminal = self.terminal();
				terminal.write_error_line("This operation requires that a Git email be specified.");
				terminal.write_line("");
				terminal.write_line("If you didn't configure your email yet, try something like this:");
				terminal.write_line("");
				for line in email_example_lines(self.config().sample_email.as_deref()) {
					terminal.write_line(&line);
				}
				terminal.write_line("");
				Err(GitError::AlreadyReported)
			}
			Err(err) => {
				let terminal = self.terminal();
				terminal.write_error_line(&format!("Error: {err}"));
				terminal.write_line("Unable to determine your Git configuration using this command:");
				terminal.write_line("");
				terminal.write_line("    git config user.email");
				terminal.write_line("");
				Err(GitError::AlreadyReported)
			}
		}
	}

	fn email_outcome(&self) -> &ResultOrError<Option<String>> {
		self.cache.email.get_or_init(|| {
			let outcome = self.config_value("user.email");
			if let Err(e) = &outcome {
				tracing::debug!(error = %e, "unable to read user.email");
			}
			outcome.into()
		})
	}
}
