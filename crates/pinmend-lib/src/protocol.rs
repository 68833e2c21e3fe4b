//! Talking to the oracle: building requests and reading its replies.
//!
//! Replies are read in two stages. [`reply::extract_structured_block()`] digs a JSON object out of
//! whatever prose surrounds it, then [`reply::parse_reply()`] checks it against the plan schema and
//! reads the pin statements. Neither stage trusts the content; that is left to the
//! [`validator`](crate::validator).

pub mod request;
pub use request::build_repair_request;
pub use request::build_summary_request;
pub use request::HISTORY_HEADING;

pub mod reply;
pub use reply::parse_reply;
pub use reply::PlanCandidate;
pub use reply::ReplyError;
