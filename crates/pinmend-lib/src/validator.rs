//! Checks every pin an oracle proposes against the known version bounds.
//!
//! A pin survives only when its version is exactly the package's ceiling or exactly its floor.
//! Anything else, including packages missing from both maps, is dropped. Versions the oracle found
//! elsewhere (say, in the log) are never accepted because nothing here can prove they exist.

use serde::*;

use crate::package::Pin;
use crate::protocol::PlanCandidate;
use crate::version_bounds::VersionBounds;

/// A plan that has been through [`validate()`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
	plausible: bool,
	pins: Vec<Pin>,
}

impl ResolutionPlan {
	pub fn not_plausible() -> Self {
		ResolutionPlan { plausible: false, pins: Vec::new() }
	}

	pub fn is_plausible(&self) -> bool {
		self.plausible
	}

	pub fn pins(&self) -> &[Pin] {
		&self.pins
	}

	pub fn into_pins(self) -> Vec<Pin> {
		self.pins
	}

	/// The pins as `name==version` statements, ready for a requirements file.
	pub fn statements(&self) -> Vec<String> {
		self.pins.iter().map(Pin::to_string).collect()
	}
}

impl From<ResolutionPlan> for PlanCandidate {
	fn from(plan: ResolutionPlan) -> Self {
		PlanCandidate { plausible: plan.plausible, pins: plan.pins, skipped: Vec::new() }
	}
}

/// Result of validating a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
	pub plan: ResolutionPlan,
	/// Pins that matched neither bound.
	pub dropped: Vec<Pin>,
}

/// Filters a candidate down to the pins the bounds can vouch for.
///
/// The plan is only plausible when the oracle said so *and* at least one pin survived. This is a pure
/// filter, validating an already validated plan gives the same plan back.
pub fn validate(candidate: &PlanCandidate, bounds: &VersionBounds) -> Validation {
	let mut pins = Vec::<Pin>::new();
	let mut dropped = Vec::<Pin>::new();

	for pin in &candidate.pins {
		match bounds.admits(pin) {
			Some(side) => {
				log::trace!("Pin {} matches {:?}", pin, side);
				pins.push(pin.clone());
			},
			None => {
				log::debug!("Dropping unverifiable pin {}", pin);
				dropped.push(pin.clone());
			},
		}
	}

	let plan = if candidate.plausible && !pins.is_empty() {
		ResolutionPlan { plausible: true, pins }
	} else {
		ResolutionPlan::not_plausible()
	};

	Validation { plan, dropped }
}
