//! Per-client fixed-window rate limiting.
//!
//! Limits are written as `<count>/<unit>` or `<count> per <unit>`, with an
//! optional multiple before the unit: `10/minute`, `100 per hour`,
//! `5/30 seconds`.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{GcopError, Result};

/// Table size that triggers the first sweep of expired windows.
const SWEEP_THRESHOLD: usize = 4096;

/// Time unit of a rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    fn seconds(self) -> u64 {
        match self {
            Granularity::Second => 1,
            Granularity::Minute => 60,
            Granularity::Hour => 3600,
            Granularity::Day => 86_400,
        }
    }

    fn parse(word: &str) -> Option<Self> {
        let word = word.to_ascii_lowercase();
        let singular = word.strip_suffix('s').unwrap_or(&word);
        match singular {
            "second" | "sec" => Some(Granularity::Second),
            "minute" | "min" => Some(Granularity::Minute),
            "hour" => Some(Granularity::Hour),
            "day" => Some(Granularity::Day),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        };
        f.write_str(name)
    }
}

/// A parsed limit: `amount` requests per `multiples` x `granularity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub amount: u32,
    pub multiples: u32,
    pub granularity: Granularity,
}

impl RateLimit {
    /// Length of one window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.granularity.seconds() * u64::from(self.multiples))
    }
}

/// Renders as `10 per 1 minute`, the form used in 429 bodies.
impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} per {} {}",
            self.amount, self.multiples, self.granularity
        )
    }
}

impl FromStr for RateLimit {
    type Err = GcopError;

    fn from_str(expr: &str) -> Result<Self> {
        let invalid = || {
            GcopError::Config(format!(
                "invalid rate limit '{}' (expected e.g. '10/minute' or '5 per 30 seconds')",
                expr
            ))
        };

        let lowered = expr.trim().to_ascii_lowercase();
        let (amount, period) = lowered
            .split_once('/')
            .or_else(|| lowered.split_once(" per "))
            .ok_or_else(invalid)?;

        let amount: u32 = amount.trim().parse().map_err(|_| invalid())?;
        if amount == 0 {
            return Err(invalid());
        }

        let mut words = period.split_whitespace();
        let first = words.next().ok_or_else(invalid)?;
        let (multiples, unit) = match first.parse::<u32>() {
            Ok(n) => (n, words.next().ok_or_else(invalid)?),
            Err(_) => (1, first),
        };
        if multiples == 0 || words.next().is_some() {
            return Err(invalid());
        }
        let granularity = Granularity::parse(unit).ok_or_else(invalid)?;

        Ok(RateLimit {
            amount,
            multiples,
            granularity,
        })
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Windows per client plus the size at which the next sweep runs.
///
/// After a sweep the mark moves to twice the surviving size, so a table full
/// of live clients is swept once per doubling rather than on every request.
#[derive(Debug)]
struct WindowTable {
    windows: HashMap<IpAddr, Window>,
    sweep_at: usize,
}

impl WindowTable {
    fn new() -> Self {
        Self {
            windows: HashMap::new(),
            sweep_at: SWEEP_THRESHOLD,
        }
    }

    fn sweep_if_due(&mut self, now: Instant, window_len: Duration) {
        if self.windows.len() < self.sweep_at {
            return;
        }
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window_len);
        self.sweep_at = (self.windows.len() * 2).max(SWEEP_THRESHOLD);
        tracing::debug!(
            "Swept rate-limit table: {} -> {} clients, next sweep at {}",
            before,
            self.windows.len(),
            self.sweep_at
        );
    }
}

/// Fixed-window counter per client IP.
///
/// The table is the only mutable state shared between requests.
pub struct RateLimiter {
    limit: RateLimit,
    table: Mutex<WindowTable>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            table: Mutex::new(WindowTable::new()),
        }
    }

    pub fn limit(&self) -> &RateLimit {
        &self.limit
    }

    /// Counts one request from `client`.
    ///
    /// Returns [`GcopError::RateLimited`] once the client has used up its
    /// window; `retry_after_secs` is the time left in that window.
    pub async fn check(&self, client: IpAddr) -> Result<()> {
        let window_len = self.limit.window();
        let now = Instant::now();
        let mut table = self.table.lock().await;
        table.sweep_if_due(now, window_len);

        let window = table.windows.entry(client).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(window.started) >= window_len {
            window.started = now;
            window.hits = 0;
        }

        if window.hits >= self.limit.amount {
            let remaining = window_len.saturating_sub(now.duration_since(window.started));
            let retry_after_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            tracing::warn!(
                "Rate limit exceeded for {}: {} (retry after {}s)",
                client,
                self.limit,
                retry_after_secs
            );
            return Err(GcopError::RateLimited {
                limit: self.limit.to_string(),
                retry_after_secs: retry_after_secs.max(1),
            });
        }

        window.hits += 1;
        Ok(())
    }
}

#[cfg(test)]
impl RateLimiter {
    async fn tracked_clients(&self) -> usize {
        self.table.lock().await.windows.len()
    }

    async fn next_sweep_at(&self) -> usize {
        self.table.lock().await.sweep_at
    }
}
