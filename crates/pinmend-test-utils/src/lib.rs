//! Various helpers for testing
//!
//! Oracles that answer from a script instead of the network, and sample install logs.

use std::cell::RefCell;
use std::collections::VecDeque;

use pinmend::oracle::{Oracle, OracleError};

/// Turns on `env_logger` output for tests, safe to call from every test.
pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A scripted response.
#[derive(Debug, Clone)]
pub enum Scripted {
	Reply(String),
	RateLimited,
	ServerError,
}

/// Answers each request with the next scripted response and records every prompt it was given.
///
/// Once the script runs out every request fails with [`OracleError::EmptyReply`].
#[derive(Debug, Default)]
pub struct ScriptedOracle {
	script: RefCell<VecDeque<Scripted>>,
	prompts: RefCell<Vec<String>>,
}

impl ScriptedOracle {
	pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
		Self {
			script: RefCell::new(script.into_iter().collect()),
			prompts: Default::default(),
		}
	}

	/// Shorthand for a script of plain replies.
	pub fn replies<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
		Self::new(replies.into_iter().map(|r| Scripted::Reply(r.into())))
	}

	pub fn prompts(&self) -> Vec<String> {
		self.prompts.borrow().clone()
	}
}

impl Oracle for ScriptedOracle {
	fn generate(&self, prompt: &str) -> Result<String, OracleError> {
		self.prompts.borrow_mut().push(prompt.to_string());
		match self.script.borrow_mut().pop_front() {
			Some(Scripted::Reply(text)) => Ok(text),
			Some(Scripted::RateLimited) => Err(OracleError::RateLimited),
			Some(Scripted::ServerError) => Err(OracleError::Status(500, "internal error".to_string())),
			None => {
				log::warn!("Scripted oracle ran out of replies");
				Err(OracleError::EmptyReply)
			},
		}
	}
}

/// Formats a reply the way a well behaved oracle would: reasoning then a fenced JSON block.
pub fn fenced_plan_reply(plausible: bool, pins: &[&str]) -> String {
	let pins: Vec<String> = pins.iter().map(|p| format!("\"{}\"", p)).collect();
	format!(
		"Reasoning: the greedy update broke an upper bound, holding a package back.\n```json\n{{\n\t\"plausible\": {},\n\t\"proposed_plan\": [{}]\n}}\n```\n",
		plausible,
		pins.join(", ")
	)
}

/// `pip` output for an install where torchvision needs a newer torch than the one requested.
pub const PIP_TORCH_CONFLICT: &str = "\
Collecting torch==2.1.0
  Using cached torch-2.1.0-cp311-cp311-manylinux1_x86_64.whl (670.2 MB)
Collecting torchvision==0.17.0
  Using cached torchvision-0.17.0-cp311-cp311-manylinux1_x86_64.whl (6.9 MB)
INFO: pip is looking at multiple versions of torchvision to determine which version is compatible with other requirements. This could take a while.
ERROR: Cannot install -r requirements.txt (line 1) and torchvision==0.17.0 because these package versions have conflicting dependencies.

The conflict is caused by:
    The user requested torch==2.1.0
    torchvision 0.17.0 depends on torch==2.2.0

To fix this you could try to:
1. loosen the range of package versions you've specified
2. remove package versions to allow pip attempt to solve the dependency conflict

ERROR: ResolutionImpossible: for help visit https://pip.pypa.io/en/latest/topics/dependency-resolution/#dealing-with-dependency-conflicts
";

/// A failure with no resolver report, only a traceback.
pub const IMPORT_ERROR_TRACEBACK: &str = "\
Traceback (most recent call last):
  File \"/app/validation.py\", line 4, in <module>
    import scipy.signal
ImportError: numpy.core.multiarray failed to import
";
