//! Time-boxed rate cache
//!
//! Wraps a [`RateSource`] with a single `(table, fetched_at)` entry.
//!
//! Failure policy: a failed fetch never updates `fetched_at`. If the current
//! entry is still inside its validity window (only possible on a forced
//! refresh) it is kept and served; otherwise the entry is dropped and an empty
//! table is returned, so an expired table is never handed out.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::clock::{Clock, SystemClock};
use crate::data::{RateSource, RateTable};

/// Default validity window for fetched rates
pub const DEFAULT_RATE_TTL_SECS: i64 = 600;

/// A fetched table and when it was fetched
#[derive(Debug)]
struct CacheEntry {
    rates: Arc<RateTable>,
    fetched_at: DateTime<Utc>,
}

/// Where the rates in a snapshot came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateOrigin {
    /// Served from a still-valid entry without fetching
    Cached,
    /// Fetched just now
    Fetched,
    /// A forced refresh failed; the still-valid entry was kept
    Retained(String),
    /// The fetch failed and no valid entry exists; the table is empty
    Unavailable(String),
}

/// Result of asking the cache for rates
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub rates: Arc<RateTable>,
    pub origin: RateOrigin,
}

impl RateSnapshot {
    /// The fetch error message, if the last fetch attempt failed
    pub fn error(&self) -> Option<&str> {
        match &self.origin {
            RateOrigin::Retained(msg) | RateOrigin::Unavailable(msg) => Some(msg),
            RateOrigin::Cached | RateOrigin::Fetched => None,
        }
    }
}

/// Caches the rate table from a [`RateSource`] for a validity window
pub struct RateCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl<S: fmt::Debug, C> fmt::Debug for RateCache<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateCache")
            .field("source", &self.source)
            .field("ttl", &self.ttl)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl<S: RateSource> RateCache<S, SystemClock> {
    /// Creates an empty cache using wall-clock time
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: RateSource, C: Clock> RateCache<S, C> {
    /// Creates an empty cache with a custom clock
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl: Duration::seconds(DEFAULT_RATE_TTL_SECS),
            entry: None,
        }
    }

    /// Overrides the validity window
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The validity window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying rate source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// When the current entry was fetched, if there is one
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    /// Whether the current entry can be served without fetching
    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| self.is_valid(entry))
    }

    /// Returns the cached rates, fetching if the entry is missing or expired
    ///
    /// Never fails. On a failed fetch the snapshot carries an empty table and
    /// [`RateOrigin::Unavailable`].
    pub async fn get_rates(&mut self) -> RateSnapshot {
        if let Some(entry) = self.entry.as_ref().filter(|e| self.is_valid(e)) {
            tracing::debug!(fetched_at = %entry.fetched_at, "serving cached rates");
            return RateSnapshot {
                rates: Arc::clone(&entry.rates),
                origin: RateOrigin::Cached,
            };
        }

        self.refresh().await
    }

    /// Fetches new rates regardless of the validity window
    pub async fn force_refresh(&mut self) -> RateSnapshot {
        tracing::info!("forced currency rate refresh");
        self.refresh().await
    }

    async fn refresh(&mut self) -> RateSnapshot {
        match self.source.fetch_rates().await {
            Ok(table) => {
                let rates = Arc::new(table);
                let fetched_at = self.clock.now();
                tracing::info!(currencies = rates.len(), "fetched currency rates");

                let missing = rates.missing_codes();
                if !missing.is_empty() {
                    tracing::warn!(?missing, "rate table lacks offered currencies");
                }

                self.entry = Some(CacheEntry {
                    rates: Arc::clone(&rates),
                    fetched_at,
                });
                RateSnapshot {
                    rates,
                    origin: RateOrigin::Fetched,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "error fetching currency rates");

                let retained = self
                    .entry
                    .as_ref()
                    .filter(|entry| self.is_valid(entry))
                    .map(|entry| Arc::clone(&entry.rates));

                match retained {
                    Some(rates) => RateSnapshot {
                        rates,
                        origin: RateOrigin::Retained(message),
                    },
                    None => {
                        self.entry = None;
                        RateSnapshot {
                            rates: Arc::new(RateTable::new()),
                            origin: RateOrigin::Unavailable(message),
                        }
                    }
                }
            }
        }
    }

    fn is_valid(&self, entry: &CacheEntry) -> bool {
        self.clock.now() - entry.fetched_at < self.ttl
    }
}
