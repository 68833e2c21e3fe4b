//! Settings for reaching the oracle and for the caller's retry loop.
//!
//! Stored as JSON. Every field is optional in the file and falls back to [`Config::default()`].
//! The API key itself is never stored, only the name of the environment variable holding it.

use serde::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	endpoint: String,
	model: String,
	api_key_env: String,
	timeout_secs: u64,
	https_only: bool,
	max_passes: u32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
			model: "gemini-2.5-flash".to_string(),
			api_key_env: "GEMINI_API_KEY".to_string(),
			timeout_secs: 60,
			https_only: true,
			max_passes: 3,
		}
	}
}

impl Config {
	/// Loads a config from a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when deserializing the file.
	pub fn load_from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the config to a JSON file, creating parent directories as needed.
	pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(file, self)?;
		Ok(())
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
	pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
		self.endpoint = endpoint.into();
	}

	pub fn model(&self) -> &str {
		&self.model
	}
	pub fn set_model(&mut self, model: impl Into<String>) {
		self.model = model.into();
	}

	pub fn api_key_env(&self) -> &str {
		&self.api_key_env
	}
	pub fn set_api_key_env(&mut self, api_key_env: impl Into<String>) {
		self.api_key_env = api_key_env.into();
	}

	/// Reads the API key from the configured environment variable.
	///
	/// # Errors
	/// [`Config`](crate::error::Error::Config) when the variable is unset or blank.
	pub fn api_key(&self) -> crate::Result<String> {
		match std::env::var(&self.api_key_env) {
			Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
			_ => Err(crate::Error::Config(format!("{} environment variable not set", self.api_key_env))),
		}
	}

	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.timeout_secs)
	}
	pub fn set_timeout_secs(&mut self, timeout_secs: u64) {
		self.timeout_secs = timeout_secs;
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}

	/// How many planning cycles the caller should run for one target before giving up.
	pub fn max_passes(&self) -> u32 {
		self.max_passes
	}
	/// returns if the value is valid or not, a session needs at least one pass.
	pub fn set_max_passes(&mut self, max_passes: u32) -> bool {
		if max_passes > 0 {
			self.max_passes = max_passes;
			true
		} else {
			false
		}
	}
}
