//! Shrinks a log down to the lines that read like real constraint statements.

use once_cell::sync::Lazy;
use regex::RegexSet;

pub const MAX_CONSTRAINT_LINES: usize = 15;
pub const MAX_EXCERPT_CHARS: usize = 2500;

static CONSTRAINT_SHAPES: Lazy<RegexSet> = Lazy::new(|| {
	RegexSet::new([
		r"^\s*[a-zA-Z0-9\-_]+.* requires .*$",
		r"^\s*[a-zA-Z0-9\-_]+.* depends on .*$",
		r"^\s*The user requested .*$",
		r"^\s*Incompatible versions: .*$",
		r"^\s*Conflict: .*$",
	]).expect("constraint shapes should compile.")
});

/// What is left of a log after compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedContext {
	/// Trimmed, deduplicated constraint sentences in log order.
	Constraints(Vec<String>),
	/// Nothing looked like a constraint so this is the head of the raw log.
	Excerpt(String),
}

impl CompressedContext {
	pub fn constraints(&self) -> &[String] {
		match self {
			CompressedContext::Constraints(lines) => lines,
			CompressedContext::Excerpt(_) => &[],
		}
	}
}

impl std::fmt::Display for CompressedContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CompressedContext::Constraints(lines) => f.write_str(&lines.join("\n")),
			CompressedContext::Excerpt(s) => f.write_str(s),
		}
	}
}

/// Collects up to [`MAX_CONSTRAINT_LINES`] constraint sentences from the log,
/// falling back to the first [`MAX_EXCERPT_CHARS`] characters when there are none.
pub fn compress_context(log: &str) -> CompressedContext {
	let mut lines = Vec::<String>::new();
	for line in log.lines() {
		if lines.len() == MAX_CONSTRAINT_LINES {
			break;
		}
		if !CONSTRAINT_SHAPES.is_match(line) {
			continue;
		}
		let line = line.trim();
		if !lines.iter().any(|l| l == line) {
			lines.push(line.to_string());
		}
	}

	if lines.is_empty() {
		log::debug!("No constraint sentences found, using log excerpt");
		CompressedContext::Excerpt(log.chars().take(MAX_EXCERPT_CHARS).collect())
	} else {
		log::debug!("Compressed log to {} constraint sentence(s)", lines.len());
		CompressedContext::Constraints(lines)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RESOLVER_LOG: &str = "\
Collecting torch==2.1.0
ERROR: Cannot install -r requirements.txt (line 3) and torchvision because these package versions have conflicting dependencies.

The conflict is caused by:
    The user requested torch==2.1.0
    torchvision 0.17.0 depends on torch==2.2.0
    The user requested torch==2.1.0
Conflict: torch 2.1.0 vs torch 2.2.0
";

	#[test]
	fn collects_constraint_sentences_in_order() {
		assert_eq!(
			compress_context(RESOLVER_LOG),
			CompressedContext::Constraints(vec![
				"The user requested torch==2.1.0".to_string(),
				"torchvision 0.17.0 depends on torch==2.2.0".to_string(),
				"Conflict: torch 2.1.0 vs torch 2.2.0".to_string(),
			])
		);
	}

	#[test]
	fn requires_and_incompatible_shapes_match() {
		let ctx = compress_context("  pkgA==1.2 requires pkgB<2.0\nIncompatible versions: pkgB 2.1\n");
		assert_eq!(ctx.constraints().len(), 2);
		assert_eq!(ctx.to_string(), "pkgA==1.2 requires pkgB<2.0\nIncompatible versions: pkgB 2.1");
	}

	#[test]
	fn caps_constraint_sentences() {
		let log: String = (0..40).map(|i| format!("pkg{i} requires dep{i}\n")).collect();
		assert_eq!(compress_context(&log).constraints().len(), MAX_CONSTRAINT_LINES);
	}

	#[test]
	fn falls_back_to_bounded_excerpt() {
		let log = "é".repeat(MAX_EXCERPT_CHARS * 2);
		match compress_context(&log) {
			CompressedContext::Excerpt(s) => assert_eq!(s.chars().count(), MAX_EXCERPT_CHARS),
			other => panic!("expected excerpt, got {:?}", other),
		}
	}

	#[test]
	fn short_log_excerpt_is_whole_log() {
		assert_eq!(compress_context("build failed"), CompressedContext::Excerpt("build failed".to_string()));
	}
}
