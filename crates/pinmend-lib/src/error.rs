//! Library error type.
//!
//! Oracle and reply problems never surface here, they are folded into [`CycleOutcome`](crate::CycleOutcome).
//! This type only covers setting things up: reading config and building the transport.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("configuration error: {0}")]
	Config(String),
}
