//! In-memory cache for currency rates
//!
//! This module provides a time-boxed cache in front of a [`RateSource`]. A
//! fetched table is reused for a validity window (600 seconds by default);
//! after that the next request fetches again. Fetch failures never propagate:
//! callers get an empty table together with the error message.
//!
//! [`RateSource`]: crate::data::RateSource

mod clock;
mod rates;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rates::{RateCache, RateOrigin, RateSnapshot, DEFAULT_RATE_TTL_SECS};
