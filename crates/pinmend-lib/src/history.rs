//! Record of plans that were tried and failed during one repair session.
//!
//! A session's history belongs to the caller. Planning cycles only ever borrow it, the caller appends
//! an [`Attempt`] after a cycle is rejected or a plan fails once applied, then passes the history into the
//! next cycle. Independent sessions therefore share nothing.

use std::collections::HashSet;

use serde::*;

use crate::package::Pin;

/// A plan that was tried together with why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
	/// May be empty when the cycle didn't produce a plan at all.
	pub plan: Vec<Pin>,
	pub reason: String,
}

impl Attempt {
	pub fn new(plan: Vec<Pin>, reason: impl Into<String>) -> Self {
		Attempt { plan, reason: reason.into() }
	}

	/// The plan as a list of quoted pin statements, e.g. `["pkga==1.0", "pkgb==2.0"]`.
	pub fn plan_text(&self) -> String {
		let pins: Vec<String> = self.plan.iter().map(|p| format!("\"{}\"", p)).collect();
		format!("[{}]", pins.join(", "))
	}
}

/// Append-only, ordered sequence of [`Attempt`]s.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
	attempts: Vec<Attempt>,
}

impl History {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, plan: Vec<Pin>, reason: impl Into<String>) {
		let attempt = Attempt::new(plan, reason);
		log::debug!("Recording failed attempt {}: {}", self.attempts.len() + 1, attempt.reason);
		self.attempts.push(attempt);
	}

	pub fn attempts(&self) -> &[Attempt] {
		&self.attempts
	}

	pub fn len(&self) -> usize {
		self.attempts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attempts.is_empty()
	}

	/// Returns the 1-based number of an earlier attempt with the same set of pins, if any.
	///
	/// Pin order is ignored. Empty plans never count as repeats.
	pub fn find_repeat(&self, plan: &[Pin]) -> Option<usize> {
		if plan.is_empty() {
			return None;
		}
		let wanted: HashSet<&Pin> = plan.iter().collect();
		self.attempts.iter()
			.position(|a| a.plan.iter().collect::<HashSet<_>>() == wanted)
			.map(|i| i + 1)
	}
}

impl From<Vec<Attempt>> for History {
	fn from(attempts: Vec<Attempt>) -> Self {
		History { attempts }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plan_text_quotes_each_pin() {
		let a = Attempt::new(vec![Pin::new("pkgA", "1.0"), Pin::new("pkgB", "2.0")], "still broken");
		assert_eq!(a.plan_text(), r#"["pkga==1.0", "pkgb==2.0"]"#);
		assert_eq!(Attempt::new(vec![], "no reply").plan_text(), "[]");
	}

	#[test]
	fn record_appends_in_order() {
		let mut h = History::new();
		h.record(vec![Pin::new("a", "1")], "first");
		h.record(vec![], "second");
		assert_eq!(h.len(), 2);
		assert_eq!(h.attempts()[0].reason, "first");
		assert_eq!(h.attempts()[1].reason, "second");
	}

	#[test]
	fn repeat_ignores_pin_order() {
		let mut h = History::new();
		h.record(vec![Pin::new("zz", "1")], "first");
		h.record(vec![Pin::new("a", "1"), Pin::new("b", "2")], "second");
		assert_eq!(h.find_repeat(&[Pin::new("B", "2"), Pin::new("a", "1")]), Some(2));
		assert_eq!(h.find_repeat(&[Pin::new("a", "1")]), None);
		assert_eq!(h.find_repeat(&[]), None);
	}
}
