use std::fmt;

use crate::error::{FunderError, Result};

/// Environment variable holding the Open Collective API key.
pub const API_KEY_ENV: &str = "OPENCOLLECTIVE_API_KEY";

/// Open Collective API key.
///
/// The key is never printed: `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the key from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is unset or blank.
    pub fn from_env_var(name: &str) -> Result<Self> {
        std::env::var(name)
            .ok()
            .and_then(|value| Self::parse(&value))
            .ok_or_else(|| {
                FunderError::Config(format!(
                    "Please `export {name}=<your opencollective api key>`"
                ))
            })
    }

    /// Reads the key from `OPENCOLLECTIVE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(API_KEY_ENV)
    }

    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_var_is_config_error() {
        let result = ApiKey::from_env_var("FUNDERFINDER_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(FunderError::Config(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("FUNDERFINDER_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(ApiKey::parse("   ").is_none());
        assert_eq!(ApiKey::parse(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ApiKey::parse("secret-key").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }
}
