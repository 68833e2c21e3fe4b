//! One planning cycle at a time: ask the oracle, read the reply, validate the plan.
//!
//! # Usage
//! 1. Create a [`CoResolver`] around an [`Oracle`].
//! 1. [`CoResolver::diagnose()`] the failure log to decide which packages to target.
//! 1. For a target, start with an empty [`History`] and call [`CoResolver::plan_one_cycle()`].
//! 1. On [`CycleOutcome::Accepted`] apply the plan and rebuild. If the rebuild still fails record the plan
//! in the history along with why, then run another cycle. [`History::find_repeat()`] tells whether an
//! accepted plan was already tried.
//! 1. On any other outcome record [`CycleOutcome::failure_reason()`] in the history and run another cycle,
//! or give up once the pass budget ([`Config::max_passes()`](crate::Config::max_passes())) is spent.
//!
//! A cycle moves `Requesting -> Validating -> {Accepted, Rejected}` and returns. The resolver keeps no
//! state between cycles, the history passed in is the only memory a session has.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::diagnosis;
use crate::history::History;
use crate::oracle::{Oracle, OracleError};
use crate::package::{PackageId, Pin};
use crate::protocol::{self, ReplyError};
use crate::validator::{self, ResolutionPlan, Validation};
use crate::version_bounds::VersionBounds;

/// Returned by [`CoResolver::summarize()`] when the oracle fails or returns nothing.
pub const SUMMARY_FALLBACK: &str = "Failed to get summary from LLM.";
/// Returned by [`CoResolver::summarize()`] when the oracle is switched off.
pub const SUMMARY_UNAVAILABLE: &str = "(LLM summary unavailable)";

/// Why a cycle ended without a plan to look at.
#[derive(Debug, Error)]
pub enum NoPlanReason {
	#[error("oracle is not available")]
	OracleUnavailable,
	#[error("oracle request failed: {0}")]
	Oracle(#[from] OracleError),
	#[error("oracle reply unusable: {0}")]
	Reply(#[from] ReplyError),
}

#[derive(Debug)]
pub enum CycleOutcome {
	/// The oracle's plan had at least one verified pin.
	Accepted(ResolutionPlan),
	/// The oracle gave up, or nothing it proposed could be verified.
	NotPlausible {
		/// Pins that matched neither floor nor ceiling.
		dropped: Vec<Pin>,
		/// Statements that weren't `name==version`.
		skipped: Vec<String>,
	},
	/// The oracle couldn't be reached or its reply couldn't be read.
	NoPlan(NoPlanReason),
}

impl CycleOutcome {
	pub fn is_accepted(&self) -> bool {
		matches!(self, CycleOutcome::Accepted(_))
	}

	/// Collapses the outcome to "plan or none".
	pub fn into_plan(self) -> Option<ResolutionPlan> {
		match self {
			CycleOutcome::Accepted(plan) => Some(plan),
			_ => None,
		}
	}

	/// A reason suitable for [`History::record()`], `None` for an accepted plan.
	pub fn failure_reason(&self) -> Option<String> {
		match self {
			CycleOutcome::Accepted(_) => None,
			CycleOutcome::NotPlausible { dropped, .. } if dropped.is_empty() => {
				Some("no plausible plan was proposed".to_string())
			},
			CycleOutcome::NotPlausible { dropped, .. } => {
				let dropped: Vec<String> = dropped.iter().map(Pin::to_string).collect();
				Some(format!("proposed versions are neither current nor latest: {}", dropped.join(", ")))
			},
			CycleOutcome::NoPlan(reason) => Some(reason.to_string()),
		}
	}
}

/// Plans co-resolutions with the help of an [`Oracle`].
#[derive(Debug)]
pub struct CoResolver<O> {
	oracle: O,
}

impl<O: Oracle> CoResolver<O> {
	pub fn new(oracle: O) -> Self {
		Self { oracle }
	}

	pub fn oracle(&self) -> &O {
		&self.oracle
	}

	/// See [`diagnosis::diagnose()`].
	pub fn diagnose(&self, log: &str) -> BTreeSet<PackageId> {
		diagnosis::diagnose(log)
	}

	/// One sentence explanation of a failure log, for people reading reports.
	///
	/// Never fails. Falls back to [`SUMMARY_FALLBACK`] or [`SUMMARY_UNAVAILABLE`].
	pub fn summarize(&self, log: &str) -> String {
		if !self.oracle.is_available() {
			return SUMMARY_UNAVAILABLE.to_string();
		}

		let context = diagnosis::compress_context(log);
		match self.oracle.generate(&protocol::build_summary_request(&context)) {
			Ok(text) if !text.trim().is_empty() => text.trim().replace('\n', " "),
			Ok(_) => {
				log::warn!("Oracle returned an empty summary");
				SUMMARY_FALLBACK.to_string()
			},
			Err(e) => {
				log::warn!("Failed to summarize error log: {}", e);
				SUMMARY_FALLBACK.to_string()
			},
		}
	}

	/// Runs a single request and validate cycle for `target`.
	///
	/// # Parameters
	/// - `target` - The package the session is trying to fix.
	/// - `log` - The raw failure log from the last install attempt.
	/// - `bounds` - Current (floor) and maximum available (ceiling) versions.
	/// - `history` - Every failed attempt of this session so far, oldest first.
	pub fn plan_one_cycle(&self, target: &PackageId, log: &str, bounds: &VersionBounds, history: &History) -> CycleOutcome {
		if !self.oracle.is_available() {
			log::debug!("Skipping plan for {}, oracle not available", target);
			return CycleOutcome::NoPlan(NoPlanReason::OracleUnavailable);
		}

		/* Requesting */
		log::info!("Requesting co-resolution plan for {} (attempt {})", target, history.len() + 1);
		let request = protocol::build_repair_request(target, log, bounds, history);
		let reply = match self.oracle.generate(&request) {
			Ok(reply) => reply,
			Err(e) => {
				log::warn!("Oracle request for {} failed: {}", target, e);
				return CycleOutcome::NoPlan(e.into());
			},
		};

		/* Validating */
		let candidate = match protocol::parse_reply(&reply) {
			Ok(candidate) => candidate,
			Err(e) => {
				log::warn!("Oracle reply for {} unusable: {}", target, e);
				return CycleOutcome::NoPlan(e.into());
			},
		};

		let Validation { plan, dropped } = validator::validate(&candidate, bounds);

		if !plan.is_plausible() {
			log::info!("No plausible plan for {} ({} pin(s) dropped)", target, dropped.len());
			return CycleOutcome::NotPlausible { dropped, skipped: candidate.skipped };
		}

		/* Deciding what to do about a repeat is up to the caller */
		if let Some(attempt) = history.find_repeat(plan.pins()) {
			log::warn!("Plan for {} repeats failed attempt {}", target, attempt);
		}

		log::info!("Accepted plan for {}: {}", target, plan.statements().join(" "));
		CycleOutcome::Accepted(plan)
	}
}
