pub mod client;
pub mod rate_limiter;
pub mod paginator;
pub mod source;

pub use client::GitHubClient;
pub use rate_limiter::RateLimiter;
pub use paginator::Paginator;
pub use source::GitHubSource;
