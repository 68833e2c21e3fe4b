//! Pulls conflicting package names and constraint sentences out of raw install logs.
//!
//! Install logs come in every shape imaginable: resolver reports, `name==1.0` pins, `name (1.0)` wheel
//! listings, loose prose. Rather than parsing any one format we run a set of independent
//! [`classifiers`] over the whole log, union their candidates and push every candidate through one shared
//! filter, [`is_valid_package_name`].
//!
//! # Usage
//! - [`diagnose()`] to get the set of packages that appear to be involved in the conflict.
//! - [`compress_context()`] to get a short excerpt of the log suitable for a prompt.

use std::collections::BTreeSet;

use crate::package::PackageId;

pub mod classifiers;
mod context;
pub use context::compress_context;
pub use context::CompressedContext;
pub use context::MAX_CONSTRAINT_LINES;
pub use context::MAX_EXCERPT_CHARS;

/// Words that turn up next to versions in logs but are never the package we are after.
pub const NOISE_WORDS: [&str; 15] = [
	"python", "pip", "setuptools", "wheel", "setup",
	"dependencies", "versions", "requirement", "conflict", "between",
	"and", "the", "version", "package", "for",
];

/// The filter every candidate has to pass regardless of which classifier found it.
///
/// `name` is expected to already be lower-cased.
pub fn is_valid_package_name(name: &str) -> bool {
	/* A bare `-` can come out of the numeric patterns, anything without an alphanumeric is rejected along with it */
	name.len() > 1
		&& name.chars().any(char::is_alphanumeric)
		&& !NOISE_WORDS.contains(&name)
}

/// Finds every package name the log suggests is part of the conflict.
///
/// An empty set means the diagnosis was inconclusive. It is not an error.
pub fn diagnose(log: &str) -> BTreeSet<PackageId> {
	let mut found = BTreeSet::<PackageId>::new();

	for (classifier_name, classifier) in classifiers::CLASSIFIERS {
		for candidate in classifier(log) {
			let candidate = candidate.to_lowercase();
			if is_valid_package_name(&candidate) {
				log::trace!("{} classifier found package {}", classifier_name, candidate);
				found.insert(PackageId::new(&candidate));
			}
		}
	}

	if found.is_empty() {
		log::debug!("No conflicting packages found in log of {} bytes", log.len());
	} else {
		log::debug!("Diagnosed {} conflicting package(s)", found.len());
	}
	found
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(log: &str) -> Vec<String> {
		diagnose(log).into_iter().map(String::from).collect()
	}

	#[test]
	fn pin_and_requirement_are_both_found() {
		assert_eq!(names("pkgA==1.2 requires pkgB<2.0"), vec!["pkga", "pkgb"]);
	}

	#[test]
	fn noise_words_are_dropped() {
		let found = names("Python 3.10.4\npip 23.1\nsetuptools>=65.0\nversion 1.2");
		assert!(found.is_empty(), "unexpected packages {:?}", found);
	}

	#[test]
	fn single_char_and_hyphen_tokens_are_dropped() {
		assert!(!is_valid_package_name("-"));
		assert!(!is_valid_package_name("--"));
		assert!(!is_valid_package_name("x"));
		assert!(is_valid_package_name("tf-keras"));
	}

	#[test]
	fn each_family_contributes() {
		let log = "\
Collecting torch 2.1.0
Installed numpy (1.26.4)
scipy>=1.11 is required
ERROR: Cannot install because of a conflict between Pandas and pyarrow";
		assert_eq!(names(log), vec!["numpy", "pandas", "pyarrow", "scipy", "torch"]);
	}

	#[test]
	fn empty_log_is_inconclusive() {
		assert!(diagnose("").is_empty());
		assert!(diagnose("everything went fine").is_empty());
	}
}
