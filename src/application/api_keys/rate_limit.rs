//! Per-key rate limiting
//!
//! Keys carry a `rate_limit` ceiling but no window is tracked yet, so every
//! request is admitted. The limit headers are sent regardless.

use crate::domain::Caller;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: i32,
    pub remaining: i32,
}

// TODO: count requests per key over a rolling hour once a shared counter store exists
pub fn check_rate_limit(caller: &Caller, default_limit: i32) -> RateLimitStatus {
    let limit = caller.rate_limit.unwrap_or(default_limit);
    RateLimitStatus {
        allowed: true,
        limit,
        remaining: (limit - 1).max(0),
    }
}
