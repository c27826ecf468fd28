//! Upstream rate source integrations
//!
//! Currently a single integration: the National Bank of the Republic of
//! Belarus (NBRB) exrates API.

pub mod nbrb;

pub use nbrb::NbrbSource;
