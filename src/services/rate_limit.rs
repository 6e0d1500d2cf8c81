use std::num::NonZeroU32;
use std::time::Duration;

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
    Quota, RateLimiter as KeyedRateLimiter,
};

type SenderLimiter<C> =
    KeyedRateLimiter<String, DashMapStateStore<String>, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Per-sender limit on recorded messages
///
/// Allows a burst of `limit` messages, refilled evenly over `window`.
/// A limit of zero rejects everything.
pub struct RateLimiter<C: Clock = DefaultClock> {
    limiter: Option<SenderLimiter<C>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self::with_clock(limit, window, &DefaultClock::default())
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(limit: u32, window: Duration, clock: &C) -> Self {
        let limiter = NonZeroU32::new(limit).and_then(|burst| {
            let period = (window / limit).max(Duration::from_nanos(1));
            Quota::with_period(period)
                .map(|quota| KeyedRateLimiter::dashmap_with_clock(quota.allow_burst(burst), clock))
        });

        Self { limiter }
    }

    /// Record one message for `sender`; false once the quota is spent
    pub fn check(&self, sender: &str) -> bool {
        match &self.limiter {
            Some(limiter) => {
                let allowed = limiter.check_key(&sender.to_string()).is_ok();
                if !allowed {
                    tracing::debug!("Rate limit reached for {}", sender);
                }
                allowed
            }
            None => false,
        }
    }

    /// Forget senders whose quota has fully refilled
    pub fn retain_recent(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Number of senders currently tracked
    pub fn tracked_senders(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }
}
