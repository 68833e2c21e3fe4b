//! Prompt text sent to the oracle.

use crate::diagnosis::{compress_context, CompressedContext};
use crate::history::History;
use crate::package::PackageId;
use crate::version_bounds::{BoundMap, VersionBounds};

pub const HISTORY_HEADING: &str = "--- PREVIOUS FAILED ATTEMPTS (DO NOT REPEAT) ---";

/// Renders a bound map as a pretty printed JSON object, `{}` when empty.
fn bound_listing(map: &BoundMap) -> String {
	let obj: serde_json::Map<String, serde_json::Value> = map.iter()
		.map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
		.collect();
	format!("{:#}", serde_json::Value::Object(obj))
}

/// Numbered list of every failed attempt so far. Empty when there is no history.
pub fn history_transcript(history: &History) -> String {
	if history.is_empty() {
		return String::new();
	}

	let mut text = format!("{}\n", HISTORY_HEADING);
	for (i, attempt) in history.attempts().iter().enumerate() {
		text += &format!("Attempt {} Plan: {}\nResult: FAILED. Reason: {}\n\n", i + 1, attempt.plan_text(), attempt.reason);
	}
	text
}

/// Builds the request asking the oracle for a co-resolution plan.
///
/// The framing never changes: a greedy update of everything to its ceiling has already failed, so the
/// oracle is told to hold at least one package back using only versions listed in the bounds.
pub fn build_repair_request(target: &PackageId, log: &str, bounds: &VersionBounds, history: &History) -> String {
	let key_constraints = match compress_context(log) {
		CompressedContext::Constraints(lines) => {
			let mut s = String::from("KEY CONSTRAINTS (extracted from the log):\n");
			for line in lines {
				s += &format!("- {}\n", line);
			}
			s
		},
		/* The excerpt is just the head of the log which is included below in full anyway */
		CompressedContext::Excerpt(_) => String::new(),
	};

	format!(
"ROLE:
You plan fixes for broken dependency installations. Your plan will be checked mechanically before it is used.

SITUATION:
1. An install failed with a dependency conflict involving '{target}'.
2. A greedy update was tried first: every involved package was moved to its maximum available version.
3. The greedy update FAILED.

IMPLICATION:
Updating everything to the latest version is not the fix. There is likely a strict pin or an upper bound
(for example \"requires package < 2.0\") that the latest versions violate.

TASK:
Read the conflict log and find a combination of versions that satisfies it. At least one package has to be
held back instead of taking its ceiling. Every version you propose MUST be either that package's current
version (floor) or its maximum available version (ceiling) as listed below. Any other version will be discarded.

DATA:
1. Target package: {target}
2. Current versions (floor):
{floor}
3. Available updates (ceiling):
{ceiling}

{key_constraints}
CONFLICT LOG:
{log}

{transcript}
OUTPUT FORMAT:
Reasoning: <which constraint broke the greedy update and which package must be held back>
```json
{{
	\"plausible\": true,
	\"proposed_plan\": [\"package==version\"]
}}
```
Set \"plausible\" to false when no combination of the listed versions can work.
",
		target = target,
		floor = bound_listing(bounds.floor()),
		ceiling = bound_listing(bounds.ceiling()),
		key_constraints = key_constraints,
		log = log,
		transcript = history_transcript(history),
	)
}

/// Builds the request for a one sentence, operator facing summary of the failure.
pub fn build_summary_request(context: &CompressedContext) -> String {
	format!(
		"Summarize the root cause of the dependency conflict in one sentence. \
		You MUST include the specific package versions mentioned in the log \
		(e.g. 'pkgA==1.2 requires pkgB<2.0'). \
		Context: {}",
		context
	)
}
