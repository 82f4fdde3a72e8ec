use std::thread;
use std::time::Duration;

use crate::domain::Version;
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Registry serves the expected version
    Confirmed,
    /// Registry serves something else (or could not be asked); usually propagation lag
    Pending { observed: Option<Version> },
}

/// Post-publish check, run once after a fixed propagation delay
pub struct Verifier {
    delay: Duration,
}

impl Verifier {
    pub fn new(delay: Duration) -> Self {
        Verifier { delay }
    }

    pub fn verify(&self, registry: &dyn Registry, package: &str, expected: &Version) -> VerificationOutcome {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match registry.published_version(package) {
            Ok(Some(observed)) if observed == *expected => VerificationOutcome::Confirmed,
            Ok(observed) => VerificationOutcome::Pending { observed },
            Err(e) => {
                tracing::debug!(error = %e, "verification query failed");
                VerificationOutcome::Pending { observed: None }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MockRegistry;

    #[test]
    fn test_confirmed_when_registry_serves_version() {
        let registry = MockRegistry::new("tool").with_published(Version::new(1, 3, 0));
        let outcome = Verifier::new(Duration::ZERO).verify(&registry, "tool", &Version::new(1, 3, 0));
        assert_eq!(outcome, VerificationOutcome::Confirmed);
    }

    #[test]
    fn test_pending_reports_observed_version() {
        let registry = MockRegistry::new("tool").with_published(Version::new(1, 2, 9));
        let outcome = Verifier::new(Duration::ZERO).verify(&registry, "tool", &Version::new(1, 3, 0));
        assert_eq!(
            outcome,
            VerificationOutcome::Pending {
                observed: Some(Version::new(1, 2, 9))
            }
        );
    }

    #[test]
    fn test_query_error_is_pending_not_failure() {
        let registry = MockRegistry::new("tool");
        let outcome = Verifier::new(Duration::ZERO).verify(&registry, "other", &Version::new(1, 0, 0));
        assert_eq!(outcome, VerificationOutcome::Pending { observed: None });
    }

    #[test]
    fn test_waits_for_the_delay() {
        let registry = MockRegistry::new("tool").with_published(Version::new(0, 1, 0));
        let start = std::time::Instant::now();
        Verifier::new(Duration::from_millis(30)).verify(&registry, "tool", &Version::new(0, 1, 0));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
