use serde::de::DeserializeOwned;
use swap_types::{BuildError, ProviderOptions};

/// Deserializes a provider's JSON options into its typed options struct.
pub(crate) fn parse_options<T: DeserializeOwned>(
    provider: &str,
    options: &ProviderOptions,
) -> Result<T, BuildError> {
    serde_json::from_value(serde_json::Value::Object(options.clone())).map_err(|e| {
        BuildError::InvalidOptions {
            provider: provider.to_string(),
            reason: e.to_string(),
        }
    })
}

pub(crate) fn invalid(provider: &str, reason: impl Into<String>) -> BuildError {
    BuildError::InvalidOptions {
        provider: provider.to_string(),
        reason: reason.into(),
    }
}

/// Access keys travel as a URL query value, so only characters that need no
/// percent-encoding are accepted.
pub(crate) fn check_access_key(provider: &str, key: &str) -> Result<(), BuildError> {
    if key.is_empty() {
        return Err(invalid(provider, "access_key must not be empty"));
    }
    let url_safe = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
    if !key.chars().all(url_safe) {
        return Err(invalid(
            provider,
            "access_key may only contain ASCII letters, digits, '-', '_', '.' and '~'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_access_key() {
        assert!(check_access_key("fixer", "a1B2-c3_d4.e5~").is_ok());

        for bad in ["", " ", "abc&base=USD", "abc#frag", "has space", "caf\u{e9}"] {
            assert!(
                matches!(
                    check_access_key("fixer", bad),
                    Err(BuildError::InvalidOptions { .. })
                ),
                "{bad:?} accepted"
            );
        }
    }
}
