pub mod clock;
pub mod store;
pub mod ttl;
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CacheStore, MemoryStore};
pub use ttl::TtlCache;
pub use widget::{InsightsGenerator, WidgetCache, WidgetCacheEntry};

use crate::error::{Error, Result};

/// GitHub logins are case-insensitive, so cache entries are keyed on the
/// lowercased name.
pub fn cache_key(username: &str) -> String {
    username.trim().to_lowercase()
}

/// GitHub logins are 1 to 39 ASCII alphanumerics or hyphens and never
/// start with a hyphen.
pub fn validate_username(username: &str) -> Result<&str> {
    let name = username.trim();
    let valid = !name.is_empty()
        && name.len() <= 39
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !name.starts_with('-');

    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidUsername(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_folds_case() {
        assert_eq!(cache_key(" OctoCat "), "octocat");
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("octocat").unwrap(), "octocat");
        assert_eq!(validate_username(" mona-lisa ").unwrap(), "mona-lisa");
        assert!(validate_username("").is_err());
        assert!(validate_username("-edge").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("../repos").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
    }
}
