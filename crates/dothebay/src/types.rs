use std::fmt::Display;

use serde::Serialize;

/// Category name to listing sub-path, in the order the site links them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    entries: Vec<(String, String)>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category. A repeated name keeps its position and takes the new path.
    pub fn insert(&mut self, name: String, path: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((name, path)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Categories {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut categories = Categories::new();
        for (name, path) in iter {
            categories.insert(name, path);
        }
        categories
    }
}

/// One event card, flattened. Field names double as CSV column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    pub fulltitle: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "streetAddress")]
    pub street_address: Option<String>,
    #[serde(rename = "addressLocality")]
    pub address_locality: Option<String>,
    #[serde(rename = "addressRegion")]
    pub address_region: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    pub venue: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub starttime: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    pub influencer_count: Option<String>,
    pub upvote: Option<String>,
    pub tickets: Option<String>,
    pub category: String,
}

impl Event {
    pub const COLUMNS: [&'static str; 15] = [
        "fulltitle",
        "title",
        "streetAddress",
        "addressLocality",
        "addressRegion",
        "postalCode",
        "venue",
        "latitude",
        "longitude",
        "starttime",
        "startDate",
        "influencer_count",
        "upvote",
        "tickets",
        "category",
    ];

    /// A record with every field empty except `category`.
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.category,
            self.fulltitle.as_deref().unwrap_or("(untitled)")
        )?;
        if let Some(venue) = &self.venue {
            write!(f, " @ {}", venue)?;
        }
        if let Some(date) = &self.start_date {
            write!(f, " on {}", date)?;
        }
        Ok(())
    }
}

/// Where a category walk stopped and what it produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWalk {
    pub pages_fetched: u32,
    /// The page that would have been fetched next, saturating at `u32::MAX`.
    pub current_page: u32,
    pub events_added: usize,
}
