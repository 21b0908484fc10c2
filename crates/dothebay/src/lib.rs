pub mod export;
mod parser;
pub mod progress;
pub mod scraper;
pub mod types;

pub use export::{ExportError, export};
pub use parser::{ListingPage, category_class, parse_categories, parse_event, parse_listing_page};
pub use progress::{NullProgress, Progress};
pub use scraper::{BayScraper, Fetch, HttpFetcher, ScraperError};

pub(crate) const BASE_URL: &str = "https://dothebay.com";

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";
