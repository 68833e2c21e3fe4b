//! The two version maps a plan is checked against.
//!
//! - *floor*: the versions currently pinned or installed, a known-safe fallback.
//! - *ceiling*: the maximum version known to be available for each package.
//!
//! Both are supplied by the caller for every attempt and never modified here.

use std::collections::BTreeMap;

use serde::*;

use crate::package::*;

/// Exact version string for each package. Ordered so listings are stable between requests.
pub type BoundMap = BTreeMap<PackageId, String>;

/// Which bound a pinned version matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
	Floor,
	Ceiling,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionBounds {
	floor: BoundMap,
	ceiling: BoundMap,
}

impl VersionBounds {
	pub fn new(floor: BoundMap, ceiling: BoundMap) -> Self {
		Self { floor, ceiling }
	}

	pub fn floor(&self) -> &BoundMap {
		&self.floor
	}

	pub fn ceiling(&self) -> &BoundMap {
		&self.ceiling
	}

	/// Checks a pin against both bounds, ceiling first.
	///
	/// Only exact string equality counts. `1.0` and `1.0.0` are different versions here.
	pub fn admits(&self, pin: &Pin) -> Option<BoundSide> {
		if self.ceiling.get(&pin.package).is_some_and(|v| *v == pin.version) {
			Some(BoundSide::Ceiling)
		} else if self.floor.get(&pin.package).is_some_and(|v| *v == pin.version) {
			Some(BoundSide::Floor)
		} else {
			None
		}
	}
}

/// Assembles [`VersionBounds`] from whatever the caller has on hand.
///
/// Later entries for the same package replace earlier ones.
#[derive(Debug, Default)]
pub struct VersionBoundsBuilder {
	floor: BoundMap,
	ceiling: BoundMap,
}

impl VersionBoundsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn floor<K, V>(mut self, versions: impl IntoIterator<Item = (K, V)>) -> Self
	where K: Into<PackageId>, V: Into<String>,
	{
		for (name, version) in versions {
			self.floor.insert(name.into(), version.into());
		}
		self
	}

	pub fn ceiling<K, V>(mut self, versions: impl IntoIterator<Item = (K, V)>) -> Self
	where K: Into<PackageId>, V: Into<String>,
	{
		for (name, version) in versions {
			self.ceiling.insert(name.into(), version.into());
		}
		self
	}

	pub fn build(self) -> VersionBounds {
		VersionBounds::new(self.floor, self.ceiling)
	}
}
