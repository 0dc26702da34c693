use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{info, warn};

/// Labels per page; the endpoint caps pages at 100 results.
pub const PAGE_SIZE: usize = 100;
/// Fetch-layer default when no page count is given by the caller.
/// Independent of the driver default in `config::DEFAULT_RUN_PAGES`.
#[allow(dead_code)]
pub const DEFAULT_PAGE_COUNT: usize = 20;

const LABEL_ENDPOINT: &str = "https://api.fda.gov/drug/label.json";

/// Paged client for the openFDA drug label endpoint.
pub struct LabelClient {
    http: reqwest::Client,
    endpoint: String,
    page_delay: Duration,
}

impl LabelClient {
    pub fn new(request_timeout: Duration, page_delay: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(LabelClient {
            http,
            endpoint: LABEL_ENDPOINT.to_string(),
            page_delay,
        })
    }

    /// Fetch one page of raw labels. Any transport or parse failure is
    /// logged and absorbed into an empty page; the caller never sees it.
    pub async fn fetch_page(&self, skip: usize, limit: usize) -> Vec<Value> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[("limit", limit), ("skip", skip)]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching labels at skip={}: {}", skip, e);
                return Vec::new();
            }
        };

        match response.json::<Value>().await {
            Ok(body) => page_results(body),
            Err(e) => {
                warn!("Error parsing labels at skip={}: {}", skip, e);
                Vec::new()
            }
        }
    }

    /// Fetch `page_count` pages sequentially, concatenating results in page
    /// order. Sleeps the courtesy delay after every page, success or not.
    pub async fn fetch_all(&self, page_count: usize) -> Vec<Value> {
        let mut all_labels = Vec::with_capacity(page_count * PAGE_SIZE);

        let pb = ProgressBar::new(page_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({per_sec}, eta {eta})")
                .unwrap()
                .progress_chars("=> "),
        );

        for page in 0..page_count {
            let results = self.fetch_page(page * PAGE_SIZE, PAGE_SIZE).await;
            if !results.is_empty() {
                all_labels.extend(results);
                info!(
                    "Page {}/{}: {} labels total",
                    page + 1,
                    page_count,
                    all_labels.len()
                );
            }
            pb.inc(1);
            tokio::time::sleep(self.page_delay).await;
        }

        pb.finish_and_clear();
        all_labels
    }
}

/// Pull the `results` list out of a response body. A body without one is
/// an empty page, not an error.
fn page_results(mut body: Value) -> Vec<Value> {
    match body.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => results,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_list() {
        let body = json!({ "results": [{ "id": "a" }, { "id": "b" }] });
        assert_eq!(page_results(body).len(), 2);
    }

    #[test]
    fn missing_results_key() {
        let body = json!({ "meta": { "skip": 0 } });
        assert!(page_results(body).is_empty());
    }

    #[test]
    fn non_list_results() {
        let body = json!({ "results": "oops" });
        assert!(page_results(body).is_empty());
    }

    #[test]
    fn non_object_body() {
        assert!(page_results(json!(null)).is_empty());
        assert!(page_results(json!([1, 2, 3])).is_empty());
    }
}
