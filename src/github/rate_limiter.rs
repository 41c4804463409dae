use chrono::Utc;
use reqwest::Response;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    per_minute: u32,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

pub(crate) fn header_value<T: std::str::FromStr>(response: &Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Seconds until the `x-ratelimit-reset` epoch, if the header is present.
pub(crate) fn seconds_until_reset(response: &Response) -> Option<u64> {
    let reset: i64 = header_value(response, "x-ratelimit-reset")?;
    Some((reset - Utc::now().timestamp()).max(0) as u64)
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_per_minute(60)
    }

    /// `per_minute` is a self-imposed ceiling below GitHub's hourly quota.
    pub fn with_per_minute(per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            per_minute: per_minute.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        if state.remaining == 0 {
            if let Some(reset_at) = state.reset_at.take() {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Rate limited, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                }
            }
        }

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed >= Duration::from_secs(60) {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        } else if state.requests_this_minute >= self.per_minute {
            let wait_time = Duration::from_secs(60) - minute_elapsed;
            drop(state);
            tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
            sleep(wait_time).await;
            state = self.state.lock().await;
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    pub async fn update_from_response(&self, response: &Response) {
        let Some(remaining) = header_value::<u32>(response, "x-ratelimit-remaining") else {
            return;
        };

        let mut state = self.state.lock().await;
        state.remaining = remaining;
        state.reset_at = seconds_until_reset(response)
            .filter(|secs| *secs > 0)
            .map(|secs| Instant::now() + Duration::from_secs(secs));
    }

    pub async fn remaining(&self) -> u32 {
        self.state.lock().await.remaining
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
