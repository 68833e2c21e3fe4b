//! Reading plan candidates out of free-form oracle replies.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::package::Pin;

/// Why a reply couldn't be turned into a [`PlanCandidate`].
#[derive(Debug, Error)]
pub enum ReplyError {
	/// No fenced JSON block and no brace delimited object anywhere in the reply.
	#[error("reply contains no structured block.")]
	NoStructuredBlock,
	#[error("structured block is not valid JSON: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("structured block does not match the plan schema: {0}")]
	Schema(String),
}

/// A plan as proposed by the oracle, before any of it has been verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCandidate {
	pub plausible: bool,
	pub pins: Vec<Pin>,
	/// Statements that couldn't be read as `name==version`, kept for diagnostics.
	pub skipped: Vec<String>,
}

static OPEN_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\n").expect("fence pattern should compile."));
static CLOSE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n```$").expect("fence pattern should compile."));
static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("fence pattern should compile."));

static PLAN_SCHEMA: Lazy<jsonschema::JSONSchema> = Lazy::new(|| {
	let schema: serde_json::Value = serde_json::from_str(include_str!("plan-reply.schema.json")).expect("plan schema should be valid json.");
	jsonschema::JSONSchema::options()
		.with_draft(jsonschema::Draft::Draft7)
		.compile(&schema)
		.expect("plan schema should compile.")
});

/// Removes a code fence wrapping the whole reply, if there is one.
fn strip_outer_fence(text: &str) -> &str {
	let text = text.trim();
	if !text.starts_with("```") {
		return text;
	}
	let start = OPEN_FENCE.find(text).map_or(0, |m| m.end());
	let end = CLOSE_FENCE.find(&text[start..]).map_or(text.len(), |m| start + m.start());
	text[start..end].trim()
}

/// Every top level balanced `{...}` span in the text, in order, found in a single pass.
///
/// Braces inside JSON string literals are ignored. An opening brace that never closes contributes nothing
/// but the spans inside it are still found. Spans nested in another span are not returned.
fn balanced_objects(text: &str) -> Vec<&str> {
	let mut open = Vec::<usize>::new();
	let mut spans = Vec::<(usize, usize)>::new();
	let mut in_string = false;
	let mut escaped = false;

	for (i, c) in text.char_indices() {
		if in_string {
			match c {
				_ if escaped => escaped = false,
				'\\' => escaped = true,
				'"' => in_string = false,
				_ => {},
			}
			continue;
		}
		match c {
			/* Quotes only mean something once we are inside a candidate */
			'"' if !open.is_empty() => in_string = true,
			'{' => open.push(i),
			'}' => {
				if let Some(start) = open.pop() {
					while spans.last().is_some_and(|(s, _)| *s > start) {
						spans.pop();
					}
					spans.push((start, i + 1));
				}
			},
			_ => {},
		}
	}

	spans.into_iter().map(|(s, e)| &text[s..e]).collect()
}

/// The first balanced span that is a JSON object, or the first balanced span at all so the parse error
/// can be reported.
fn first_object(text: &str) -> Option<&str> {
	let candidates = balanced_objects(text);
	candidates.iter()
		.copied()
		.find(|c| matches!(serde_json::from_str::<serde_json::Value>(c), Ok(serde_json::Value::Object(_))))
		.or_else(|| candidates.first().copied())
}

/// Stage one: locate the structured part of a reply.
///
/// Tries a fenced block tagged `json` first, then the first top level object in the rest of the text.
pub fn extract_structured_block(reply: &str) -> Option<&str> {
	if let Some(m) = JSON_FENCE.captures(reply).and_then(|c| c.get(1)) {
		log::trace!("Found fenced JSON block in reply");
		return Some(m.as_str());
	}

	let found = first_object(strip_outer_fence(reply));
	if found.is_some() {
		log::trace!("Found bare JSON object in reply");
	}
	found
}

/// Stage two: check the block against the plan schema and read its pin statements.
///
/// Pin statements that aren't strings or don't split into exactly two parts on `==` are skipped one by
/// one, they never invalidate the rest of the reply.
pub fn parse_block(block: &str) -> Result<PlanCandidate, ReplyError> {
	let v: serde_json::Value = serde_json::from_str(block)?;

	if let Err(e) = PLAN_SCHEMA.validate(&v) {
		let msg: Vec<String> = e.map(|ve| ve.to_string()).collect();
		return Err(ReplyError::Schema(msg.join("; ")));
	}

	let mut candidate = PlanCandidate {
		plausible: v.get("plausible").and_then(|p| p.as_bool()).unwrap_or(false),
		..Default::default()
	};

	let statements = v.get("proposed_plan").and_then(|p| p.as_array()).map(Vec::as_slice).unwrap_or_default();
	for statement in statements {
		match statement.as_str().and_then(Pin::parse) {
			Some(pin) => candidate.pins.push(pin),
			None => {
				log::debug!("Skipping malformed pin statement {}", statement);
				candidate.skipped.push(statement.to_string());
			},
		}
	}

	Ok(candidate)
}

/// Both stages together.
pub fn parse_reply(reply: &str) -> Result<PlanCandidate, ReplyError> {
	let block = extract_structured_block(reply).ok_or(ReplyError::NoStructuredBlock)?;
	parse_block(block)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fenced_block_is_preferred() {
		let reply = "Reasoning: hold back {numpy}.\n```json\n{\"plausible\": true, \"proposed_plan\": [\"numpy==1.26.4\"]}\n```\nthanks";
		assert_eq!(extract_structured_block(reply), Some("{\"plausible\": true, \"proposed_plan\": [\"numpy==1.26.4\"]}"));
	}

	#[test]
	fn bare_object_is_found_in_prose() {
		let reply = "Sure! Here you go: {\"plausible\": false, \"proposed_plan\": []} Hope that helps.";
		assert_eq!(extract_structured_block(reply), Some("{\"plausible\": false, \"proposed_plan\": []}"));
	}

	#[test]
	fn untagged_outer_fence_is_stripped() {
		let reply = "```\n{\"plausible\": true, \"proposed_plan\": [\"a==1\"]}\n```";
		assert_eq!(extract_structured_block(reply), Some("{\"plausible\": true, \"proposed_plan\": [\"a==1\"]}"));
	}

	#[test]
	fn nested_and_quoted_braces_are_balanced() {
		let reply = "x {\"plausible\": true, \"note\": \"use } carefully\", \"meta\": {\"a\": 1}, \"proposed_plan\": []} y {}";
		assert_eq!(
			extract_structured_block(reply),
			Some("{\"plausible\": true, \"note\": \"use } carefully\", \"meta\": {\"a\": 1}, \"proposed_plan\": []}")
		);
	}

	#[test]
	fn unclosed_brace_is_skipped() {
		assert_eq!(extract_structured_block("oops { then {\"plausible\": false}"), Some("{\"plausible\": false}"));
	}

	#[test]
	fn prose_braces_before_plan_are_passed_over() {
		let reply = "Reasoning: the set {torch, torchvision} conflicts with {numpy}.\n{\"plausible\": true, \"proposed_plan\": [\"pkgB==1.5\"]}";
		let candidate = parse_reply(reply).unwrap();
		assert!(candidate.plausible);
		assert_eq!(candidate.pins, vec![Pin::new("pkgb", "1.5")]);
	}

	#[test]
	fn non_object_json_is_passed_over() {
		assert_eq!(extract_structured_block("see {} and [1] {\"plausible\": false}"), Some("{}"));
		assert_eq!(extract_structured_block("list {[1, 2]} then {\"plausible\": false}"), Some("{\"plausible\": false}"));
	}

	#[test]
	fn many_unclosed_braces_are_rejected() {
		assert!(matches!(parse_reply(&"{".repeat(60_000)), Err(ReplyError::NoStructuredBlock)));
		let reply = format!("{}{{\"plausible\": false}}", "{ ".repeat(60_000));
		assert_eq!(parse_reply(&reply).unwrap(), PlanCandidate::default());
	}

	#[test]
	fn unmatched_close_is_ignored() {
		assert_eq!(extract_structured_block("}} oops {\"plausible\": false}"), Some("{\"plausible\": false}"));
	}

	#[test]
	fn no_block_is_reported() {
		assert!(matches!(parse_reply("I could not find a fix."), Err(ReplyError::NoStructuredBlock)));
	}

	#[test]
	fn invalid_json_is_reported() {
		assert!(matches!(parse_reply("{plausible: yes}"), Err(ReplyError::SerdeJSON(_))));
	}

	#[test]
	fn schema_requires_boolean_flag() {
		assert!(matches!(parse_reply(r#"{"plausible": "yes", "proposed_plan": []}"#), Err(ReplyError::Schema(_))));
		assert!(matches!(parse_reply(r#"{"proposed_plan": ["a==1"]}"#), Err(ReplyError::Schema(_))));
	}

	#[test]
	fn plausible_plan_requires_pin_list() {
		assert!(matches!(parse_reply(r#"{"plausible": true}"#), Err(ReplyError::Schema(_))));
		assert!(matches!(parse_reply(r#"{"plausible": true, "proposed_plan": "a==1"}"#), Err(ReplyError::Schema(_))));
	}

	#[test]
	fn implausible_reply_may_omit_pins() {
		assert_eq!(parse_reply(r#"{"plausible": false}"#).unwrap(), PlanCandidate::default());
	}

	#[test]
	fn malformed_statements_are_skipped_individually() {
		let candidate = parse_reply(r#"{"plausible": true, "proposed_plan": ["a==1", "b>=2", 7, "c==3==4", "d==4"]}"#).unwrap();
		assert!(candidate.plausible);
		assert_eq!(candidate.pins, vec![Pin::new("a", "1"), Pin::new("d", "4")]);
		assert_eq!(candidate.skipped, vec!["\"b>=2\"", "7", "\"c==3==4\""]);
	}
}
