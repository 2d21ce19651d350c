// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Sink for user-facing diagnostics: progress notes, warnings and
/// remediation text.
pub trait Terminal: Send + Sync {
	fn write_line(&self, message: &str);
	fn write_warning_line(&self, message: &str);
	fn write_error_line(&self, message: &str);
}

/// Writes plain lines to stdout and warnings/errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleTerminal;

impl Terminal for ConsoleTerminal {
	fn write_line(&self, message: &str) {
		let _ = writeln!(std::io::stdout().lock(), "{message}");
	}

	fn write_warning_line(&self, message: &str) {
		let _ = writeln!(std::io::stderr().lock(), "warning: {message}");
	}

	fn write_error_line(&self, message: &str) {
		let _ = writeln!(std::io::stderr().lock(), "error: {message}");
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
	Normal,
	Warning,
	Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalLine {
	pub kind: LineKind,
	pub message: String,
}

/// Terminal that keeps every line in memory.
#[derive(Clone, Default)]
pub struct RecordingTerminal {
	lines: Arc<Mutex<Vec<TerminalLine>>>,
}

impl RecordingTerminal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn lines(&self) -> Vec<TerminalLine> {
		self.lines.lock().unwrap().clone()
	}

	pub fn warnings(&self) -> Vec<String> {
		self.messages(LineKind::Warning)
	}

	pub fn errors(&self) -> Vec<String> {
		self.messages(LineKind::Error)
	}

	/// Full text written so far, one line per entry.
	pub fn output(&self) -> String {
		self.lines()
			.into_iter()
			.map(|line| line.message)
			.collect::<Vec<_>>()
			.join("\n")
	}

	fn messages(&self, kind: LineKind) -> Vec<String> {
		self.lines()
			.into_iter()
			.filter(|line| line.kind == kind)
			.map(|line| line.message)
			.collect()
	}

	fn push(&self, kind: LineKind, message: &str) {
		self.lines.lock().unwrap().push(TerminalLine {
			kind,
			message: message.to_string(),
		});
	}
}

impl Terminal for RecordingTerminal {
	fn write_line(&self, message: &str) {
		self.push(LineKind::Normal, message);
	}

	fn write_warning_line(&self, message: &str) {
		self.push(LineKind::Warning, message);
	}

	fn write_error_line(&self, message: &str) {
		self.push(LineKind::Error, message);
	}
}
