//! frankfurter.app provider (European Central Bank reference rates).

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_types::{
    BuildError, HttpContext, ProviderError, ProviderOptions, Rate, RateProvider, RateQuery,
};

use crate::http::{decode, fetch};
use crate::options::parse_options;

/// Registry name of the frankfurter provider.
pub const NAME: &str = "frankfurter";

const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrankfurterOptions {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for FrankfurterOptions {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

pub struct FrankfurterProvider {
    name: String,
    options: FrankfurterOptions,
    http: HttpContext,
}

impl FrankfurterProvider {
    pub fn new(name: impl Into<String>, options: FrankfurterOptions, http: HttpContext) -> Self {
        Self {
            name: name.into(),
            options,
            http,
        }
    }

    pub fn from_options(
        name: &str,
        options: &ProviderOptions,
        http: &HttpContext,
    ) -> Result<Self, BuildError> {
        Ok(Self::new(name, parse_options(name, options)?, http.clone()))
    }

    fn url(&self, query: &RateQuery) -> String {
        let endpoint = match query.date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "latest".to_string(),
        };
        format!(
            "{}/{}?from={}&to={}",
            self.options.base_url.trim_end_matches('/'),
            endpoint,
            query.base(),
            query.quote()
        )
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError> {
        let url = self.url(query);
        let response = fetch(&self.http, &url).await?;

        // Unknown currencies and dates before the first fixing come back as 404.
        if response.status == 404 {
            return Err(ProviderError::QuoteUnavailable(format!(
                "{} has no data for {}",
                self.name, query
            )));
        }

        let body: FrankfurterResponse = decode(&response, &url)?;
        let value = body.rates.get(query.quote().as_str()).ok_or_else(|| {
            ProviderError::QuoteUnavailable(format!("{} returned no rate for {}", self.name, query))
        })?;

        Ok(Rate::new(query.clone(), *value, &self.name)?)
    }
}
