use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Allows `requests` per second, all of them available as a single burst.
pub fn per_second_limiter(requests: NonZeroU32) -> Limiter {
    let quota = Quota::per_second(requests);
    Arc::new(RateLimiter::direct(quota))
}
