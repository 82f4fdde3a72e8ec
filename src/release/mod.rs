//! After publication: tag the release locally and confirm the registry serves it.
//!
//! Nothing here can fail the release; problems surface as
//! [`BoundaryWarning`](crate::boundary::BoundaryWarning)s.

pub mod tagger;
pub mod verifier;

pub use tagger::{ReleaseTagger, TagOutcome};
pub use verifier::{VerificationOutcome, Verifier};
