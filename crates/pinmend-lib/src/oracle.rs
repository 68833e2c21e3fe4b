//! The boundary to the external reasoning service.
//!
//! The oracle is untrusted and non-deterministic. Nothing it returns is used without going through
//! [`protocol`](crate::protocol) and [`validator`](crate::validator) first, and none of its failures are
//! fatal to the caller.

use thiserror::Error;

mod gemini;
pub use gemini::GeminiOracle;

/// Errors that can occur during a round trip to the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
	/// The service is rate limiting or out of quota, trying again later may work.
	#[error("oracle rate limited or quota exhausted.")]
	RateLimited,
	/// The oracle has been switched off.
	#[error("oracle is not available.")]
	Unavailable,
	#[error("oracle responded with status {0}: {1}")]
	Status(u16, String),
	/// The response arrived but contained no text.
	#[error("oracle reply contained no text.")]
	EmptyReply,
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

/// A service that turns a prompt into a reply.
pub trait Oracle {
	/// One blocking round trip.
	fn generate(&self, prompt: &str) -> Result<String, OracleError>;

	/// `false` lets callers skip building a prompt that can't be answered.
	fn is_available(&self) -> bool {
		true
	}
}

impl<O: Oracle + ?Sized> Oracle for &O {
	fn generate(&self, prompt: &str) -> Result<String, OracleError> {
		(**self).generate(prompt)
	}

	fn is_available(&self) -> bool {
		(**self).is_available()
	}
}

/// Stands in when no oracle is configured. Every request is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineOracle;

impl Oracle for OfflineOracle {
	fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
		Err(OracleError::Unavailable)
	}

	fn is_available(&self) -> bool {
		false
	}
}
