use crate::parser::{category_class, parse_categories, parse_listing_page};
use crate::progress::Progress;
use crate::types::{Categories, Event, PageWalk};

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Issues a GET and hands back the body, whatever the status.
pub trait Fetch {
    fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<String, ScraperError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<String, ScraperError> {
        let mut target =
            Url::parse(url).map_err(|e| ScraperError::InvalidUrl(format!("{url}: {e}")))?;
        if !params.is_empty() {
            target.query_pairs_mut().extend_pairs(params);
        }

        let response = self
            .client
            .get(target)
            .send()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!(
                "Expected response status code 200, instead received {} for {}",
                status.as_u16(),
                url
            );
        }

        Ok(response
            .text()
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}

pub struct BayScraper<F: Fetch> {
    fetcher: F,
    base_url: String,
}

impl BayScraper<HttpFetcher> {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?, crate::BASE_URL))
    }
}

impl<F: Fetch> BayScraper<F> {
    pub fn with_fetcher(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    pub fn discover_categories(&self) -> Result<Categories, ScraperError> {
        log::info!("Fetching categories from {}...", self.base_url);
        let html = self.fetcher.fetch(&self.base_url, &[])?;
        let categories = parse_categories(&html);
        if categories.is_empty() {
            log::debug!("No category links found on {}", self.base_url);
        }
        Ok(categories)
    }

    /// Walks the listing pages of one category, appending every parsed card to
    /// `events`. Stops after `max_pages` pages or once a page has no next-page link.
    pub fn walk_category(
        &self,
        name: &str,
        path: &str,
        max_pages: u32,
        events: &mut Vec<Event>,
        progress: &mut dyn Progress,
    ) -> Result<PageWalk, ScraperError> {
        let url = format!("{}{}", self.base_url, path);
        let class_category = category_class(path);
        let before = events.len();

        let mut walk = PageWalk {
            current_page: 1,
            ..Default::default()
        };

        for current_page in 1..=max_pages {
            progress.page_started(name, current_page, max_pages);
            log::info!("Fetching {} page {}...", name, current_page);

            let html = self
                .fetcher
                .fetch(&url, &[("page", current_page.to_string())])?;
            walk.pages_fetched += 1;
            walk.current_page = current_page.saturating_add(1);

            let page = parse_listing_page(&html, &class_category);
            if page.events.is_empty() {
                log::debug!(
                    "No '{}' event cards on {} page {}",
                    class_category,
                    name,
                    current_page
                );
            }
            for event in &page.events {
                log::trace!("Parsed {}", event);
            }
            events.extend(page.events);

            if !page.has_next {
                break;
            }
        }

        walk.events_added = events.len() - before;
        Ok(walk)
    }

    /// Discovers the categories and walks each one. With a filter, only the
    /// named categories are walked, in the filter's order.
    pub fn load_all(
        &self,
        page_limit: u32,
        category_filter: Option<&[String]>,
        progress: &mut dyn Progress,
    ) -> Result<Vec<Event>, ScraperError> {
        progress.section("Downloading Available Categories");
        let categories = self.discover_categories()?;
        progress.categories_found(categories.len());

        let selected: Vec<&str> = match category_filter {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => categories.names().collect(),
        };

        let mut events = Vec::new();
        for name in selected {
            let Some(path) = categories.get(name) else {
                log::warn!("Unknown category '{}', skipping", name);
                continue;
            };

            progress.category_started(name);
            let walk = self.walk_category(name, path, page_limit, &mut events, progress)?;
            log::debug!(
                "{}: {} page(s), {} event(s)",
                name,
                walk.pages_fetched,
                walk.events_added
            );
            progress.category_finished(name, walk.events_added);
        }

        Ok(events)
    }
}
