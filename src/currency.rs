//! Tracked currencies and their NBRB identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracked currency (ISO 4217 codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// Russian Ruble
    RUB,
    /// Chinese Yuan
    CNY,
}

impl Currency {
    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::RUB => "RUB",
            Currency::CNY => "CNY",
        }
    }

    /// Numeric identifier used by the NBRB exrates API (`Cur_ID`)
    pub fn cur_id(&self) -> u32 {
        match self {
            Currency::USD => 431,
            Currency::EUR => 451,
            Currency::RUB => 456,
            Currency::CNY => 508,
        }
    }

    /// Parse from ISO code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "RUB" => Some(Currency::RUB),
            "CNY" => Some(Currency::CNY),
            _ => None,
        }
    }

    /// Get all tracked currencies
    pub fn all() -> [Currency; 4] {
        [Currency::USD, Currency::EUR, Currency::RUB, Currency::CNY]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
