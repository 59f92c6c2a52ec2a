//! fixer.io provider.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_types::{
    BuildError, HttpContext, ProviderError, ProviderOptions, Rate, RateProvider, RateQuery,
};

use crate::http::{ApiErrorBody, api_error, decode, fetch};
use crate::options::{check_access_key, parse_options};

/// Registry name of the fixer provider.
pub const NAME: &str = "fixer";

const DEFAULT_BASE_URL: &str = "http://data.fixer.io/api";

/// Only base currency available outside enterprise plans.
const FREE_PLAN_BASE: &str = "EUR";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixerOptions {
    pub access_key: String,
    #[serde(default)]
    pub enterprise: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize)]
struct FixerResponse {
    success: bool,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
    error: Option<ApiErrorBody>,
}

pub struct FixerProvider {
    name: String,
    options: FixerOptions,
    http: HttpContext,
}

impl FixerProvider {
    pub fn new(
        name: impl Into<String>,
        options: FixerOptions,
        http: HttpContext,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        check_access_key(&name, &options.access_key)?;
        Ok(Self {
            name,
            options,
            http,
        })
    }

    pub fn from_options(
        name: &str,
        options: &ProviderOptions,
        http: &HttpContext,
    ) -> Result<Self, BuildError> {
        Self::new(name, parse_options(name, options)?, http.clone())
    }

    fn url(&self, query: &RateQuery) -> String {
        let endpoint = match query.date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "latest".to_string(),
        };
        let mut url = format!(
            "{}/{}?access_key={}&symbols={}",
            self.options.base_url.trim_end_matches('/'),
            endpoint,
            self.options.access_key,
            query.quote()
        );
        if self.options.enterprise {
            url.push_str(&format!("&base={}", query.base()));
        }
        url
    }
}

#[async_trait]
impl RateProvider for FixerProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError> {
        if !self.options.enterprise && query.base().as_str() != FREE_PLAN_BASE {
            return Err(ProviderError::UnsupportedQuery(format!(
                "{} serves only {} base rates without an enterprise plan",
                self.name, FREE_PLAN_BASE
            )));
        }

        let url = self.url(query);
        let response = fetch(&self.http, &url).await?;
        let body: FixerResponse = decode(&response, &url)?;

        if !body.success {
            return Err(api_error(body.error));
        }

        let value = body.rates.get(query.quote().as_str()).ok_or_else(|| {
            ProviderError::QuoteUnavailable(format!("{} returned no rate for {}", self.name, query))
        })?;

        Ok(Rate::new(query.clone(), *value, &self.name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, http_context};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn provider(transport: &Arc<MockTransport>, enterprise: bool) -> FixerProvider {
        let options = json!({
            "access_key": "secret",
            "enterprise": enterprise,
            "base_url": "http://fixer.test/api",
        });
        FixerProvider::from_options(
            "fixer",
            options.as_object().unwrap(),
            &http_context(transport.clone()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_rate() {
        let transport = Arc::new(MockTransport::new().respond(
            200,
            r#"{"success":true,"base":"EUR","date":"2024-01-02","rates":{"USD":1.0956}}"#,
        ));
        let fixer = provider(&transport, false);

        let rate = fixer
            .resolve(&RateQuery::new("EUR", "USD", None).unwrap())
            .await
            .unwrap();

        assert_eq!(rate.value(), dec!(1.0956));
        assert_eq!(rate.provider(), "fixer");
        assert_eq!(
            transport.last_url().unwrap(),
            "http://fixer.test/api/latest?access_key=secret&symbols=USD"
        );
    }

    #[tokio::test]
    async fn test_historical_enterprise_url() {
        let transport = Arc::new(
            MockTransport::new().respond(200, r#"{"success":true,"rates":{"EUR":0.91}}"#),
        );
        let fixer = provider(&transport, true);
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let rate = fixer
            .resolve(&RateQuery::new("USD", "EUR", Some(date)).unwrap())
            .await
            .unwrap();

        assert_eq!(rate.value(), dec!(0.91));
        assert_eq!(
            transport.last_url().unwrap(),
            "http://fixer.test/api/2024-01-02?access_key=secret&symbols=EUR&base=USD"
        );
    }

    #[tokio::test]
    async fn test_free_plan_rejects_non_eur_base() {
        let transport = Arc::new(MockTransport::new());
        let fixer = provider(&transport, false);

        let err = fixer
            .resolve(&RateQuery::new("USD", "EUR", None).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UnsupportedQuery(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let transport = Arc::new(MockTransport::new().respond(
            200,
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"bad key"}}"#,
        ));
        let fixer = provider(&transport, false);

        let err = fixer
            .resolve(&RateQuery::new("EUR", "USD", None).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { code: 101, .. }));
    }

    #[tokio::test]
    async fn test_missing_symbol_is_unavailable() {
        let transport = Arc::new(
            MockTransport::new().respond(200, r#"{"success":true,"rates":{"GBP":0.86}}"#),
        );
        let fixer = provider(&transport, false);

        let err = fixer
            .resolve(&RateQuery::new("EUR", "USD", None).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::QuoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_zero_rate_is_invalid() {
        let transport = Arc::new(
            MockTransport::new().respond(200, r#"{"success":true,"rates":{"USD":0}}"#),
        );
        let fixer = provider(&transport, false);

        let err = fixer
            .resolve(&RateQuery::new("EUR", "USD", None).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::InvalidRate(_)));
    }

    #[test]
    fn test_access_key_required() {
        let transport = Arc::new(MockTransport::new());
        let missing = FixerProvider::from_options(
            "fixer",
            json!({}).as_object().unwrap(),
            &http_context(transport.clone()),
        );
        assert!(matches!(missing, Err(BuildError::InvalidOptions { .. })));

        let empty = FixerProvider::from_options(
            "fixer",
            json!({"access_key": " "}).as_object().unwrap(),
            &http_context(transport),
        );
        assert!(matches!(empty, Err(BuildError::InvalidOptions { .. })));
    }

    #[test]
    fn test_access_key_must_be_url_safe() {
        let transport = Arc::new(MockTransport::new());
        let result = FixerProvider::from_options(
            "fixer",
            json!({"access_key": "abc&base=USD"}).as_object().unwrap(),
            &http_context(transport),
        );
        assert!(matches!(result, Err(BuildError::InvalidOptions { .. })));
    }
}
