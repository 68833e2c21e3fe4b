//! Independent candidate finders.
//!
//! Each classifier returns every raw candidate it matched, in the case it appeared in the log.
//! None of them filter, that is done once by [`diagnose()`](super::diagnose).

use once_cell::sync::Lazy;
use regex::Regex;

pub type Classifier = fn(&str) -> Vec<String>;

/// Every classifier paired with a name for logging.
pub const CLASSIFIERS: [(&str, Classifier); 4] = [
	("operator", operator_pins),
	("loose", loose_versions),
	("parenthesized", parenthesized_versions),
	("contextual", contextual_phrases),
];

const NAME: &str = r"[a-zA-Z0-9\-_]+";

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("classifier pattern should compile.")
}

static OPERATOR: Lazy<Regex> = Lazy::new(|| compile(&format!(r"(?P<name>{NAME})(?:==|>=|<=|~=|!=|<|>)\s*v?\d")));
static LOOSE: Lazy<Regex> = Lazy::new(|| compile(&format!(r"(?P<name>{NAME})\s+\d+(?:\.\d+)+")));
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| compile(&format!(r"(?P<name>{NAME})\s*\(\d+(?:\.\d+)+\)")));
static CONTEXTUAL: Lazy<[Regex; 2]> = Lazy::new(|| [
	compile(r#"(?i)conflicts?\s+(?:between|among|with|in)\s+((?:[`'"]?[a-zA-Z0-9\-_]+[`'"]?(?:,?[ \t]+and[ \t]+|,?[ \t]*)?)+)"#),
	compile(r#"(?i)requirement\s+([`'"]?[a-zA-Z0-9\-_]+)"#),
]);

fn capture_names(re: &Regex, log: &str) -> Vec<String> {
	re.captures_iter(log)
		.filter_map(|c| c.name("name"))
		.map(|m| m.as_str().to_string())
		.collect()
}

/// `name==1.0`, `name>=1.0`, `name<2` and the other comparison operators.
pub fn operator_pins(log: &str) -> Vec<String> {
	capture_names(&OPERATOR, log)
}

/// `name 1.0.2` with no operator, as printed by `pip list` and most resolver reports.
pub fn loose_versions(log: &str) -> Vec<String> {
	capture_names(&LOOSE, log)
}

/// `name (1.0.2)`
pub fn parenthesized_versions(log: &str) -> Vec<String> {
	capture_names(&PARENTHESIZED, log)
}

/// Word lists trailing phrases like "conflict between a, b and c" or "the requirement a".
///
/// The list is split on commas and whitespace and each token is returned on its own with any quoting
/// removed. The list never runs past the end of its line.
pub fn contextual_phrases(log: &str) -> Vec<String> {
	let mut tokens = Vec::<String>::new();
	for re in CONTEXTUAL.iter() {
		for c in re.captures_iter(log) {
			let raw_list = match c.get(1) {
				Some(m) => m.as_str(),
				None => continue,
			};
			tokens.extend(
				raw_list.split(|c: char| c == ',' || c.is_whitespace())
					.map(|t| t.trim_matches(|c| c == '`' || c == '\'' || c == '"'))
					.filter(|t| !t.is_empty())
					.map(str::to_string)
			);
		}
	}
	tokens
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shared_patterns_compile() {
		for re in [&*OPERATOR, &*LOOSE, &*PARENTHESIZED].into_iter().chain(CONTEXTUAL.iter()) {
			assert!(!re.as_str().is_empty());
		}
	}

	#[test] fn operator_finds_each_operator() { assert_eq!(operator_pins("a1==1 b2>=1 c3<=1 d4~=1 e5!=1 f6<1 g7>1"), vec!["a1", "b2", "c3", "d4", "e5", "f6", "g7"]) }
	#[test] fn operator_needs_a_version() { assert!(operator_pins("a -> b and c => d").is_empty()) }
	#[test] fn loose_finds_dotted_versions() { assert_eq!(loose_versions("torch 2.1.0 requires triton 2.1"), vec!["torch", "triton"]) }
	#[test] fn loose_ignores_plain_numbers() { assert!(loose_versions("retrying 3 times").is_empty()) }
	#[test] fn parenthesized_with_and_without_space() { assert_eq!(parenthesized_versions("numpy (1.26.4) and scipy(1.11.0)"), vec!["numpy", "scipy"]) }

	#[test]
	fn contextual_splits_word_lists() {
		assert_eq!(
			contextual_phrases("There are conflicts among `torch`, torchvision and torchaudio\nnext line"),
			vec!["torch", "torchvision", "and", "torchaudio"]
		);
	}

	#[test]
	fn contextual_requirement_takes_one_word() {
		assert_eq!(contextual_phrases("Could not find a version that satisfies the requirement 'tensorflow' now"), vec!["tensorflow"]);
	}

	#[test]
	fn contextual_is_case_insensitive() {
		assert_eq!(contextual_phrases("CONFLICT WITH Flask"), vec!["Flask"]);
	}
}
