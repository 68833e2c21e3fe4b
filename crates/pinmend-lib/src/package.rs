//! Package names and version pins.

use serde::*;

/// A normalized package name.
///
/// Names are compared case-insensitively, so the name is lower-cased when constructed.
/// `PkgA`, `pkga` and ` PKGA ` all refer to the same package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageId(String);

impl PackageId {
	pub fn new(name: &str) -> Self {
		PackageId(name.trim().to_lowercase())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for PackageId {
	fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for PackageId {
	fn from(value: String) -> Self { Self::new(&value) }
}

impl From<PackageId> for String {
	fn from(value: PackageId) -> Self { value.0 }
}

impl AsRef<str> for PackageId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for PackageId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A single `name==version` pin statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pin {
	pub package: PackageId,
	pub version: String,
}

impl Pin {
	pub fn new(package: impl Into<PackageId>, version: impl Into<String>) -> Self {
		Pin { package: package.into(), version: version.into() }
	}

	/// Parses a `name==version` statement.
	///
	/// Returns `None` unless the statement splits into exactly two non-empty parts on `==`.
	pub fn parse(statement: &str) -> Option<Self> {
		let parts: Vec<&str> = statement.split("==").map(str::trim).collect();
		match parts.as_slice() {
			[name, version] if !name.is_empty() && !version.is_empty() => Some(Pin::new(*name, *version)),
			_ => None,
		}
	}
}

impl std::fmt::Display for Pin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}=={}", self.package, self.version)
	}
}
