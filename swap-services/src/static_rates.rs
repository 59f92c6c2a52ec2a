//! Provider answering from a fixed in-memory table.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_types::{
    BuildError, CurrencyPair, DomainError, ProviderError, ProviderOptions, Rate, RateProvider,
    RateQuery,
};

use crate::options::{invalid, parse_options};

/// Registry name of the static provider.
pub const NAME: &str = "static";

type RateTable = HashMap<CurrencyPair, Decimal>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticOptions {
    #[serde(default)]
    latest: HashMap<String, Decimal>,
    #[serde(default)]
    historical: Option<HashMap<NaiveDate, HashMap<String, Decimal>>>,
}

/// Serves configured rates.
///
/// Historical queries are unsupported unless at least one historical
/// table was configured.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    name: String,
    latest: RateTable,
    historical: Option<HashMap<NaiveDate, RateTable>>,
}

impl StaticRateProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest: HashMap::new(),
            historical: None,
        }
    }

    /// Adds a latest rate.
    pub fn with_rate(mut self, pair: CurrencyPair, value: Decimal) -> Result<Self, DomainError> {
        check_positive(value)?;
        self.latest.insert(pair, value);
        Ok(self)
    }

    /// Adds a rate for `date`.
    pub fn with_historical_rate(
        mut self,
        date: NaiveDate,
        pair: CurrencyPair,
        value: Decimal,
    ) -> Result<Self, DomainError> {
        check_positive(value)?;
        self.historical
            .get_or_insert_with(HashMap::new)
            .entry(date)
            .or_default()
            .insert(pair, value);
        Ok(self)
    }

    /// Builds the provider from options of the form
    /// `{"latest": {"EUR/USD": 1.1}, "historical": {"2024-01-02": {"EUR/USD": 1.05}}}`.
    pub fn from_options(name: &str, options: &ProviderOptions) -> Result<Self, BuildError> {
        let parsed: StaticOptions = parse_options(name, options)?;

        let latest = to_table(name, parsed.latest)?;
        let historical = parsed
            .historical
            .map(|days| {
                days.into_iter()
                    .map(|(date, rates)| Ok((date, to_table(name, rates)?)))
                    .collect::<Result<HashMap<_, _>, BuildError>>()
            })
            .transpose()?;

        Ok(Self {
            name: name.to_string(),
            latest,
            historical,
        })
    }

    fn lookup(&self, query: &RateQuery) -> Result<Decimal, ProviderError> {
        let table = match query.date() {
            None => Some(&self.latest),
            Some(date) => {
                let Some(days) = &self.historical else {
                    return Err(ProviderError::UnsupportedQuery(format!(
                        "{} has no historical rates",
                        self.name
                    )));
                };
                days.get(&date)
            }
        };

        table
            .and_then(|rates| rates.get(query.pair()))
            .copied()
            .ok_or_else(|| {
                ProviderError::QuoteUnavailable(format!("{} has no rate for {}", self.name, query))
            })
    }
}

fn check_positive(value: Decimal) -> Result<(), DomainError> {
    if value <= Decimal::ZERO {
        return Err(DomainError::NonPositiveRate(value));
    }
    Ok(())
}

fn to_table(provider: &str, raw: HashMap<String, Decimal>) -> Result<RateTable, BuildError> {
    raw.into_iter()
        .map(|(pair, value)| {
            let pair: CurrencyPair = pair
                .parse()
                .map_err(|e: DomainError| invalid(provider, e.to_string()))?;
            check_positive(value).map_err(|e| invalid(provider, format!("{pair}: {e}")))?;
            Ok((pair, value))
        })
        .collect()
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError> {
        let value = self.lookup(query)?;
        Ok(Rate::new(query.clone(), value, &self.name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn options(value: serde_json::Value) -> ProviderOptions {
        value.as_object().cloned().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[tokio::test]
    async fn test_latest_from_options() {
        let provider =
            StaticRateProvider::from_options("static", &options(json!({"latest": {"EUR/USD": 1.1}})))
                .unwrap();

        let rate = provider
            .resolve(&RateQuery::new("EUR", "USD", None).unwrap())
            .await
            .unwrap();
        assert_eq!(rate.value(), dec!(1.1));
        assert_eq!(rate.provider(), "static");
    }

    #[tokio::test]
    async fn test_missing_pair_is_unavailable() {
        let provider =
            StaticRateProvider::from_options("static", &options(json!({"latest": {"EUR/USD": 1.1}})))
                .unwrap();

        let err = provider
            .resolve(&RateQuery::new("USD", "EUR", None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::QuoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_historical_without_table_is_unsupported() {
        let provider = StaticRateProvider::new("static")
            .with_rate(CurrencyPair::from_codes("EUR", "USD").unwrap(), dec!(1.1))
            .unwrap();

        let err = provider
            .resolve(&RateQuery::new("EUR", "USD", Some(date())).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedQuery(_)));
    }

    #[tokio::test]
    async fn test_historical_lookup() {
        let provider = StaticRateProvider::from_options(
            "static",
            &options(json!({"historical": {"2024-01-02": {"EUR/USD": "1.05"}}})),
        )
        .unwrap();

        let rate = provider
            .resolve(&RateQuery::new("EUR", "USD", Some(date())).unwrap())
            .await
            .unwrap();
        assert_eq!(rate.value(), dec!(1.05));

        let other_day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let err = provider
            .resolve(&RateQuery::new("EUR", "USD", Some(other_day)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::QuoteUnavailable(_)));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let negative = StaticRateProvider::from_options(
            "static",
            &options(json!({"latest": {"EUR/USD": -1}})),
        );
        assert!(matches!(negative, Err(BuildError::InvalidOptions { .. })));

        let bad_pair =
            StaticRateProvider::from_options("static", &options(json!({"latest": {"EURUSD": 1}})));
        assert!(matches!(bad_pair, Err(BuildError::InvalidOptions { .. })));

        let unknown_field =
            StaticRateProvider::from_options("static", &options(json!({"rates": {}})));
        assert!(matches!(unknown_field, Err(BuildError::InvalidOptions { .. })));
    }

    #[test]
    fn test_builder_rejects_zero() {
        let result = StaticRateProvider::new("static")
            .with_rate(CurrencyPair::from_codes("EUR", "USD").unwrap(), dec!(0));
        assert!(matches!(result, Err(DomainError::NonPositiveRate(_))));
    }
}
