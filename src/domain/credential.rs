use std::fmt;

/// Minimum length accepted for an interactive one-time code
pub const MIN_ONE_TIME_CODE_LEN: usize = 6;

/// Registry authentication for a single publish attempt.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    AutomationToken(String),
    OneTimeCode(String),
}

impl Credential {
    pub fn mode(&self) -> &'static str {
        match self {
            Credential::AutomationToken(_) => "automation-token",
            Credential::OneTimeCode(_) => "one-time-code",
        }
    }

    pub fn secret(&self) -> &str {
        match self {
            Credential::AutomationToken(s) | Credential::OneTimeCode(s) => s,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::AutomationToken(_) => f.write_str("AutomationToken(<redacted>)"),
            Credential::OneTimeCode(_) => f.write_str("OneTimeCode(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let token = Credential::AutomationToken("npm_supersecret".to_string());
        let otp = Credential::OneTimeCode("123456".to_string());
        assert!(!format!("{:?}", token).contains("supersecret"));
        assert!(!format!("{:?}", otp).contains("123456"));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(
            Credential::AutomationToken("t".into()).mode(),
            "automation-token"
        );
        assert_eq!(Credential::OneTimeCode("c".into()).mode(), "one-time-code");
    }
}
