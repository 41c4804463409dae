use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::rate_limiter::{header_value, seconds_until_reset, RateLimiter};

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

fn page_url(base_url: &str, per_page: u32, page: u32) -> String {
    let separator = if base_url.contains('?') { "&" } else { "?" };
    format!("{}{}per_page={}&page={}", base_url, separator, per_page, page)
}

fn has_next_page(response: &Response) -> bool {
    response
        .headers()
        .get("link")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("rel=\"next\""))
        .unwrap_or(false)
}

/// Maps non-success responses onto the crate's error variants.
pub async fn ensure_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let exhausted = header_value::<u32>(&response, "x-ratelimit-remaining") == Some(0);
    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
        return Err(Error::RateLimited(seconds_until_reset(&response).unwrap_or(60)));
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("{}: {} - {}", context, status, body)))
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
    ) -> Result<Vec<T>> {
        self.fetch_pages(base_url, per_page, None).await
    }

    pub async fn fetch_limited<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: u32,
    ) -> Result<Vec<T>> {
        self.fetch_pages(base_url, per_page, Some(max_items as usize))
            .await
    }

    async fn fetch_pages<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            self.rate_limiter.wait().await;

            let url = page_url(base_url, per_page, page);
            tracing::debug!("Fetching: {}", url);
            let response = self.client.get(&url).send().await?;
            self.rate_limiter.update_from_response(&response).await;
            // GitHub answers 409 for listings of an empty repository.
            if response.status() == StatusCode::CONFLICT {
                break;
            }
            let response = ensure_success(response, base_url).await?;

            let has_next = has_next_page(&response);
            let items: Vec<T> = response.json().await?;
            let items_count = items.len();
            all_items.extend(items);

            let limit_reached = max_items.map_or(false, |max| all_items.len() >= max);
            if limit_reached || !has_next || items_count < per_page as usize {
                break;
            }

            page += 1;
        }

        if let Some(max) = max_items {
            all_items.truncate(max);
        }
        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_separator() {
        assert_eq!(
            page_url("https://api.github.com/users/a/events/public", 100, 2),
            "https://api.github.com/users/a/events/public?per_page=100&page=2"
        );
        assert_eq!(
            page_url("https://api.github.com/users/a/repos?type=owner", 100, 1),
            "https://api.github.com/users/a/repos?type=owner&per_page=100&page=1"
        );
    }
}
