pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod package;
pub use package::PackageId;
pub use package::Pin;

pub mod version_bounds;
pub use version_bounds::VersionBounds;
pub use version_bounds::VersionBoundsBuilder;

pub mod diagnosis;
pub mod history;
pub use history::History;

pub mod oracle;
pub use oracle::Oracle;

pub mod protocol;
pub mod validator;
pub use validator::ResolutionPlan;

pub mod co_resolution;
pub use co_resolution::CoResolver;
pub use co_resolution::CycleOutcome;
