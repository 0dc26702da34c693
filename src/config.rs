use std::path::PathBuf;
use std::time::Duration;

/// Pages requested by a default top-level run (100 labels per page).
pub const DEFAULT_RUN_PAGES: usize = 50;

/// Everything a run needs, passed explicitly into the driver.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Pages to fetch from the label endpoint.
    pub pages: usize,
    /// Directory the CSV/JSON dataset is written into.
    pub out_dir: PathBuf,
    /// Courtesy delay between page requests.
    pub page_delay: Duration,
    /// Per-request ceiling; a request past this counts as an empty page.
    pub request_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            pages: DEFAULT_RUN_PAGES,
            out_dir: PathBuf::from("data/processed"),
            page_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
        }
    }
}
