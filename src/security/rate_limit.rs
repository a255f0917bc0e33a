//! Fixed-window rate limiting keyed by client identity.
//!
//! A client may make `max_requests` requests per window. The window starts
//! with the client's first request and the count resets once it closes.
//! A burst at the tail of one window followed by a burst at the head of the
//! next can admit up to twice the limit in a short span.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::RateLimitConfig;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::{audit, metrics};
use crate::security::client_ip::client_identifier;
use crate::security::store::{InMemoryStore, RateLimitRecord, RateLimitStore};

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Longest accepted window. Longer windows are clamped so that
/// `Instant + window` cannot overflow.
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl RateLimitDecision {
    fn admitted(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining: Some(remaining),
        }
    }

    fn denied() -> Self {
        Self {
            allowed: false,
            remaining: Some(0),
        }
    }
}

/// Fixed-window admission control over a [`RateLimitStore`].
pub struct FixedWindowLimiter<S = InMemoryStore> {
    store: Mutex<S>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter<InMemoryStore> {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_store(InMemoryStore::new(), max_requests, window)
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }
}

impl<S: RateLimitStore> FixedWindowLimiter<S> {
    pub fn with_store(store: S, max_requests: u32, window: Duration) -> Self {
        if window > MAX_WINDOW {
            tracing::warn!(
                window_secs = window.as_secs(),
                max_secs = MAX_WINDOW.as_secs(),
                "Rate limit window too long, clamping"
            );
        }
        Self {
            store: Mutex::new(store),
            max_requests,
            window: window.min(MAX_WINDOW),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or refuse one request from `identifier`.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_at(identifier, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    ///
    /// Eviction, lookup and increment happen under a single lock so concurrent
    /// callers cannot both pass the limit.
    pub fn check_at(&self, identifier: &str, now: Instant) -> RateLimitDecision {
        let mut store = self.store.lock().expect("rate limiter mutex poisoned");

        let evicted = store.evict_expired(now);
        if evicted > 0 {
            tracing::trace!(evicted, "Evicted expired rate limit windows");
        }

        let mut record = store
            .get(identifier)
            .unwrap_or_else(|| RateLimitRecord::fresh(now, self.window));

        if record.is_expired(now) {
            record = RateLimitRecord::fresh(now, self.window);
        }

        if record.count >= self.max_requests {
            return RateLimitDecision::denied();
        }

        record.count += 1;
        store.set(identifier, record);

        RateLimitDecision::admitted(self.max_requests - record.count)
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.store.lock().expect("rate limiter mutex poisoned").len()
    }
}

/// Middleware applying the shared limiter to every request.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config().rate_limit.enabled {
        return next.run(request).await;
    }

    let client = client_identifier(request.headers());
    let decision = state.limiter.check(&client);

    if !decision.allowed {
        tracing::warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        metrics::record_rate_limited("fixed_window");
        audit::log_security_event(
            "rate_limit_exceeded",
            &client,
            request.uri().path(),
            request.headers(),
        );
        return ApiError::RateLimited {
            retry_after_secs: state.limiter.window().as_secs(),
        }
        .into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(state.limiter.max_requests()));
    if let Some(remaining) = decision.remaining {
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(15 * 60);

    #[test]
    fn test_counts_down_then_denies() {
        let limiter = FixedWindowLimiter::new(100, WINDOW);
        let now = Instant::now();

        for expected in (0..100).rev() {
            let decision = limiter.check_at("1.2.3.4", now);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, Some(expected));
        }

        let denied = limiter.check_at("1.2.3.4", now);
        assert_eq!(denied, RateLimitDecision { allowed: false, remaining: Some(0) });

        // Denials do not consume further capacity or extend the window.
        let again = limiter.check_at("1.2.3.4", now + Duration::from_secs(60));
        assert!(!again.allowed);
    }

    #[test]
    fn test_window_reset() {
        let limiter = FixedWindowLimiter::new(100, WINDOW);
        let start = Instant::now();
        for _ in 0..101 {
            limiter.check_at("client", start);
        }

        let later = start + WINDOW + Duration::from_millis(1);
        assert_eq!(
            limiter.check_at("client", later),
            RateLimitDecision { allowed: true, remaining: Some(99) }
        );
    }

    #[test]
    fn test_identifiers_are_isolated() {
        let limiter = FixedWindowLimiter::new(2, WINDOW);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);

        assert_eq!(limiter.check_at("b", now).remaining, Some(1));
        assert_eq!(limiter.tracked(), 2);
    }

    #[test]
    fn test_expired_windows_are_evicted() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(10));
        let now = Instant::now();
        limiter.check_at("old", now);
        limiter.check_at("new", now + Duration::from_secs(11));
        assert_eq!(limiter.tracked(), 1);
    }

    // Fixed windows admit a full burst on each side of a boundary.
    #[test]
    fn test_boundary_burst_is_admitted() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(10));
        let start = Instant::now();

        let tail = start + Duration::from_secs(10);
        let head = tail + Duration::from_millis(1);
        let admitted = (0..3)
            .map(|_| limiter.check_at("burst", start))
            .chain((0..3).map(|_| limiter.check_at("burst", tail)))
            .chain((0..3).map(|_| limiter.check_at("burst", head)))
            .filter(|d| d.allowed)
            .count();
        assert_eq!(admitted, 6);
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(u64::MAX));
        assert_eq!(limiter.window(), MAX_WINDOW);

        let now = Instant::now();
        assert!(limiter.check_at("client", now).allowed);
        assert!(limiter.check_at("client", now + Duration::from_secs(3600)).allowed);
        assert!(!limiter.check_at("client", now + Duration::from_secs(7200)).allowed);
    }

    #[test]
    fn test_zero_limit_denies_everything() {
        let limiter = FixedWindowLimiter::new(0, WINDOW);
        assert!(!limiter.check("anyone").allowed);
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_concurrent_callers_never_exceed_limit() {
        use std::sync::Arc;

        let limiter = Arc::new(FixedWindowLimiter::new(50, WINDOW));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..20).filter(|_| limiter.check("shared").allowed).count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }
}
