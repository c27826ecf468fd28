//! Core types and constants

use crate::currency::Currency;
use std::collections::BTreeMap;

/// Official rate type (using f64, matching the upstream decimal field)
pub type Rate = f64;

/// One poll's worth of rates, keyed by tracked currency.
///
/// Ordered so the serialized snapshot has a deterministic key order.
pub type RateMap = BTreeMap<Currency, Rate>;

/// Timestamp format used in the snapshot document and change log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used for snapshot keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";
