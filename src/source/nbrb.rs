//! NBRB exrates API integration
//!
//! Fetches official exchange rates from the National Bank of the Republic of
//! Belarus. No API key required.

use crate::currency::Currency;
use crate::error::{MonitorError, Result};
use crate::types::{Rate, RateMap};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// One currency record from the exrates endpoint.
///
/// The upstream document carries more fields (scale, abbreviation, names in
/// three languages); only the identifier and the official rate matter here.
/// A record without an official rate is unusable.
#[derive(Debug, Clone, Deserialize)]
pub struct NbrbRecord {
    #[serde(rename = "Cur_ID")]
    pub cur_id: u32,
    #[serde(rename = "Cur_OfficialRate")]
    pub official_rate: Option<Rate>,
}

/// NBRB rate source
pub struct NbrbSource {
    client: Client,
    api_url: String,
    /// Rate periodicity: 0 = daily, 1 = monthly
    periodicity: u32,
    /// Request rates as of a specific date instead of the latest publication
    ondate: Option<NaiveDate>,
}

impl NbrbSource {
    /// Create a new NBRB source for the given endpoint
    pub fn new(api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ratewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MonitorError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            periodicity: 0,
            ondate: None,
        })
    }

    /// Request monthly instead of daily rates
    pub fn with_periodicity(mut self, periodicity: u32) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// Request rates as of a specific date
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.ondate = Some(date);
        self
    }

    /// Fetch the current official rates for the tracked currencies.
    ///
    /// A missing record or missing rate field drops that currency from the
    /// result; transport and body-level failures are errors for the whole
    /// call.
    pub async fn fetch_rates(&self, tracked: &[Currency]) -> Result<RateMap> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if self.periodicity != 0 {
            query.push(("periodicity", self.periodicity.to_string()));
        }
        if let Some(date) = self.ondate {
            query.push(("ondate", date.format("%Y-%m-%d").to_string()));
        }

        log::debug!("Requesting rates from {}", self.api_url);
        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MonitorError::HttpError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MonitorError::HttpError(format!(
                "NBRB API returned error: {}",
                response.status()
            )));
        }

        let records: Vec<NbrbRecord> = response
            .json()
            .await
            .map_err(|e| MonitorError::DataError(format!("Malformed NBRB response: {}", e)))?;

        Ok(rates_from_records(&records, tracked))
    }
}

/// Extract the official rate for each tracked currency from parsed records.
///
/// Currencies with no matching record, or whose record has no rate, are
/// skipped; the rest of the map is unaffected.
pub fn rates_from_records(records: &[NbrbRecord], tracked: &[Currency]) -> RateMap {
    let mut rates = RateMap::new();
    for currency in tracked {
        let record = records.iter().find(|r| r.cur_id == currency.cur_id());
        match record.and_then(|r| r.official_rate) {
            Some(rate) => {
                rates.insert(*currency, rate);
            }
            None => {
                log::warn!("No official rate for {} in NBRB response", currency);
            }
        }
    }
    rates
}
