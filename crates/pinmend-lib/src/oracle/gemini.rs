//! Oracle backed by the Gemini `generateContent` REST endpoint.

use super::*;

pub struct GeminiOracle {
	client: reqwest::blocking::Client,
	url: String,
	api_key: String,
}

impl GeminiOracle {
	/// Creates an oracle from the config, reading the API key from the environment.
	///
	/// # Errors
	/// - [`Config`](crate::error::Error::Config) when the API key variable isn't set.
	/// - [`Reqwest`](crate::error::Error::Reqwest) when the HTTP client can't be built.
	pub fn new(config: &crate::Config) -> crate::Result<Self> {
		let api_key = config.api_key()?;
		Self::with_api_key(config, api_key)
	}

	pub fn with_api_key(config: &crate::Config, api_key: String) -> crate::Result<Self> {
		let client = reqwest::blocking::Client::builder()
			.https_only(config.https_only())
			.timeout(config.timeout())
			.build()?;

		Ok(GeminiOracle {
			client,
			url: format!("{}/models/{}:generateContent", config.endpoint().trim_end_matches('/'), config.model()),
			api_key,
		})
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

impl std::fmt::Debug for GeminiOracle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeminiOracle").field("url", &self.url).finish_non_exhaustive()
	}
}

impl Oracle for GeminiOracle {
	fn generate(&self, prompt: &str) -> Result<String, OracleError> {
		let body = serde_json::json!({
			"contents": [{ "parts": [{ "text": prompt }] }]
		});

		log::debug!("Sending {} byte prompt to {}", prompt.len(), self.url);
		let response = self.client
			.post(&self.url)
			.header("x-goog-api-key", &self.api_key)
			.header("content-type", "application/json")
			.body(serde_json::to_string(&body)?)
			.send()?;

		match status_to_result(response.status()) {
			Ok(()) => reply_text_from_body(&response.text()?),
			Err(OracleError::Status(code, reason)) => Err(OracleError::Status(code, response.text().unwrap_or(reason))),
			Err(e) => Err(e),
		}
	}
}

/// Maps a response status to the matching error before the body is touched.
fn status_to_result(status: reqwest::StatusCode) -> Result<(), OracleError> {
	if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
		Err(OracleError::RateLimited)
	} else if !status.is_success() {
		Err(OracleError::Status(status.as_u16(), status.canonical_reason().unwrap_or_default().to_string()))
	} else {
		Ok(())
	}
}

/// Joins the text parts of the first candidate in a `generateContent` response body.
fn reply_text_from_body(body: &str) -> Result<String, OracleError> {
	let v: serde_json::Value = serde_json::from_str(body)?;

	let parts = v.get("candidates")
		.and_then(|c| c.as_array())
		.and_then(|a| a.first())
		.and_then(|c| c.get("content"))
		.and_then(|c| c.get("parts"))
		.and_then(|p| p.as_array())
		.ok_or(OracleError::EmptyReply)?;

	let text: String = parts.iter()
		.filter_map(|p| p.get("text").and_then(|t| t.as_str()))
		.collect();

	if text.trim().is_empty() {
		Err(OracleError::EmptyReply)
	} else {
		Ok(text)
	}
}
