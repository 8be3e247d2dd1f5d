use std::time::Duration;

use url::Url;

/// Tag page listing the hall's daily result pages.
pub const LIST_URL: &str =
    "https://min-repo.com/tag/%e3%83%80%e3%82%a4%e3%83%8a%e3%83%a0%e6%bb%8b%e8%b3%80%e5%bd%a6%e6%a0%b9%e5%ba%97/";

/// Worksheet that accumulates the scraped history.
pub const SPREADSHEET_KEY: &str = "1SEDGQLHGRN0rnXgLvP7wNzUuch6oxs9W4AvsavTagKM";

/// How many detail pages to visit per run.
pub const MAX_PAGES: usize = 2;

/// Run configuration. All values are static for now; `page_wait` is the
/// pause after each page load so client-side rendering can settle. It is a
/// pacing heuristic, not a correctness mechanism.
#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_key: String,
    pub list_url: Url,
    pub max_pages: usize,
    pub page_wait: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            spreadsheet_key: SPREADSHEET_KEY.to_string(),
            list_url: Url::parse(LIST_URL).expect("LIST_URL must be a valid URL"),
            max_pages: MAX_PAGES,
            page_wait: Duration::from_secs(5),
        }
    }
}
