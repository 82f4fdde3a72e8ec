//! Domain logic - pure business rules independent of git, the registry and the terminal

pub mod candidate;
pub mod credential;
pub mod tag;
pub mod version;

pub use candidate::{PublishCandidate, VersionChoice};
pub use credential::{Credential, MIN_ONE_TIME_CODE_LEN};
pub use tag::TagPattern;
pub use version::{Version, VersionBump};
