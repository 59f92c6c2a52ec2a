//! Shared plumbing for HTTP-backed providers.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use swap_types::{HttpContext, HttpResponse, ProviderError, redact_url};
use tracing::debug;

/// Error envelope used by the apilayer family of APIs (fixer, currencylayer).
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub info: String,
}

/// apilayer "no results", "invalid base/source" and "invalid symbols" codes.
const UNAVAILABLE_CODES: [i64; 3] = [106, 201, 202];

impl ApiErrorBody {
    pub(crate) fn into_error(self) -> ProviderError {
        if UNAVAILABLE_CODES.contains(&self.code) {
            ProviderError::QuoteUnavailable(self.info)
        } else {
            ProviderError::Api {
                code: self.code,
                info: self.info,
            }
        }
    }
}

pub(crate) fn api_error(error: Option<ApiErrorBody>) -> ProviderError {
    match error {
        Some(body) => body.into_error(),
        None => ProviderError::Api {
            code: 0,
            info: "request unsuccessful without error details".into(),
        },
    }
}

/// Sends a GET for `url`; only transport failures are errors here.
pub(crate) async fn fetch(http: &HttpContext, url: &str) -> Result<HttpResponse, ProviderError> {
    let response = http.get(url).await?;
    debug!(url = %redact_url(url), status = response.status, "Provider response");
    Ok(response)
}

/// Checks the status and decodes the JSON body.
pub(crate) fn decode<T: DeserializeOwned>(
    response: &HttpResponse,
    url: &str,
) -> Result<T, ProviderError> {
    if !response.is_success() {
        return Err(ProviderError::HttpStatus {
            status: response.status,
            url: redact_url(url),
        });
    }
    serde_json::from_str(&response.body)
        .map_err(|e| ProviderError::MalformedPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_decode_rejects_non_success() {
        let response = HttpResponse::new(503, "down");
        let result: Result<HashMap<String, f64>, _> = decode(&response, "http://x");
        assert!(matches!(
            result,
            Err(ProviderError::HttpStatus { status: 503, .. })
        ));
    }

    #[test]
    fn test_status_error_hides_access_key() {
        let response = HttpResponse::new(401, "unauthorized");
        let result: Result<HashMap<String, f64>, _> =
            decode(&response, "http://x/latest?access_key=secret&symbols=USD");
        let err = result.unwrap_err().to_string();
        assert!(!err.contains("secret"), "{err}");
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let response = HttpResponse::new(200, "<html>");
        let result: Result<HashMap<String, f64>, _> = decode(&response, "http://x");
        assert!(matches!(result, Err(ProviderError::MalformedPayload(_))));
    }

    #[test]
    fn test_api_error_mapping() {
        let unavailable = ApiErrorBody {
            code: 202,
            info: "invalid symbols".into(),
        };
        assert!(matches!(
            unavailable.into_error(),
            ProviderError::QuoteUnavailable(_)
        ));

        let auth = ApiErrorBody {
            code: 101,
            info: "invalid access key".into(),
        };
        assert!(matches!(auth.into_error(), ProviderError::Api { code: 101, .. }));
    }
}
