//! currencylayer.com provider.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_types::{
    BuildError, HttpContext, ProviderError, ProviderOptions, Rate, RateProvider, RateQuery,
};

use crate::http::{ApiErrorBody, api_error, decode, fetch};
use crate::options::{check_access_key, parse_options};

/// Registry name of the currencylayer provider.
pub const NAME: &str = "currency_layer";

const DEFAULT_BASE_URL: &str = "http://api.currencylayer.com";

/// Only source currency available outside enterprise plans.
const FREE_PLAN_SOURCE: &str = "USD";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyLayerOptions {
    pub access_key: String,
    #[serde(default)]
    pub enterprise: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Quotes are keyed by source and target concatenated, e.g. `"USDEUR"`.
#[derive(Debug, Deserialize)]
struct CurrencyLayerResponse {
    success: bool,
    #[serde(default)]
    quotes: HashMap<String, Decimal>,
    error: Option<ApiErrorBody>,
}

pub struct CurrencyLayerProvider {
    name: String,
    options: CurrencyLayerOptions,
    http: HttpContext,
}

impl CurrencyLayerProvider {
    pub fn new(
        name: impl Into<String>,
        options: CurrencyLayerOptions,
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
        let base_url = self.options.base_url.trim_end_matches('/');
        let mut url = match query.date() {
            Some(date) => format!(
                "{}/historical?access_key={}&date={}",
                base_url,
                self.options.access_key,
                date.format("%Y-%m-%d")
            ),
            None => format!("{}/live?access_key={}", base_url, self.options.access_key),
        };
        url.push_str(&format!("&currencies={}", query.quote()));
        if self.options.enterprise {
            url.push_str(&format!("&source={}", query.base()));
        }
        url
    }
}

#[async_trait]
impl RateProvider for CurrencyLayerProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError> {
        if !self.options.enterprise && query.base().as_str() != FREE_PLAN_SOURCE {
            return Err(ProviderError::UnsupportedQuery(format!(
                "{} serves only {} source rates without an enterprise plan",
                self.name, FREE_PLAN_SOURCE
            )));
        }

        let url = self.url(query);
        let response = fetch(&self.http, &url).await?;
        let body: CurrencyLayerResponse = decode(&response, &url)?;

        if !body.success {
            return Err(api_error(body.error));
        }

        let key = format!("{}{}", query.base(), query.quote());
        let value = body.quotes.get(&key).ok_or_else(|| {
            ProviderError::QuoteUnavailable(format!("{} returned no quote {}", self.name, key))
        })?;

        Ok(Rate::new(query.clone(), *value, &self.name)?)
    }
}
