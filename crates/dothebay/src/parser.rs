use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Categories, Event};

static RE_CLASS_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/|events|today|\d").expect("invalid regex: category class noise")
});

static RE_START_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d,:PMA]*").expect("invalid regex: start time"));

static SEL_CATEGORY_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a.ga-tracking[data-ga-action="CATEGORIES"]"#).unwrap()
});
static SEL_NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.ds-next-page").unwrap());
static SEL_BYLINE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ds-byline").unwrap());
static SEL_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ds-listing-event-title-text").unwrap());
static SEL_VENUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[itemprop="url"][href*="/venues/"]"#).unwrap());
static SEL_EVENT_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ds-event-time.dtstart").unwrap());
static SEL_INFLUENCERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ds-listing-influencer-count").unwrap());
static SEL_UPVOTE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ds-upvote-default").unwrap());
static SEL_TICKETS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[title="BUY TICKETS"]"#).unwrap());

/// Events found on one listing page, plus whether the site links a further page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub events: Vec<Event>,
    pub has_next: bool,
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

fn first_text_trimmed(scope: ElementRef, selector: &Selector) -> Option<String> {
    first(scope, selector).map(|e| elem_text(e).trim().to_string())
}

fn meta_attr(scope: ElementRef, itemprop: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[itemprop="{}"]"#, itemprop)).ok()?;
    first(scope, &selector)?
        .value()
        .attr(attr)
        .map(str::to_string)
}

/// Category links on the site root, keyed by their visible text.
pub fn parse_categories(html: &str) -> Categories {
    let document = Html::parse_document(html);

    document
        .select(&SEL_CATEGORY_LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some((elem_text(a), href.to_string()))
        })
        .collect()
}

/// The token the listing markup uses in its `ds-event-category-*` class.
///
/// `/music/events/today` becomes `music`.
pub fn category_class(path: &str) -> String {
    RE_CLASS_NOISE.replace_all(path, "").into_owned()
}

fn card_selector(class_category: &str) -> Option<Selector> {
    Selector::parse(&format!(
        "div.ds-listing.event-card.ds-event-category-{}",
        class_category
    ))
    .ok()
}

pub fn parse_listing_page(html: &str, class_category: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let events = match card_selector(class_category) {
        Some(selector) => document
            .select(&selector)
            .map(|card| parse_event(card, class_category))
            .collect(),
        None => {
            log::debug!("No usable card selector for category class '{class_category}'");
            Vec::new()
        }
    };

    let has_next = document.select(&SEL_NEXT_PAGE).next().is_some();

    ListingPage { events, has_next }
}

/// Extracts every known field from an event card. Missing markup leaves fields empty.
pub fn parse_event(card: ElementRef, category: &str) -> Event {
    let mut event = Event::empty(category);

    extract_title(card, &mut event);
    event.street_address = meta_attr(card, "streetAddress", "content");
    event.address_locality = meta_attr(card, "addressLocality", "content");
    event.address_region = meta_attr(card, "addressRegion", "content");
    event.postal_code = meta_attr(card, "postalCode", "content");
    event.venue = first_text_trimmed(card, &SEL_VENUE);
    extract_geo(card, &mut event);
    extract_time(card, &mut event);
    event.influencer_count = first_text_trimmed(card, &SEL_INFLUENCERS);
    event.upvote = first(card, &SEL_UPVOTE).map(elem_text);
    event.tickets = first(card, &SEL_TICKETS)
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    event
}

// Each group below writes its fields in order and gives up at the first miss.

fn extract_title(card: ElementRef, event: &mut Event) -> Option<()> {
    let byline = first_text_trimmed(card, &SEL_BYLINE)?;
    let title = first_text_trimmed(card, &SEL_TITLE)?;
    event.fulltitle = Some(format!("{} {}", byline, title));
    event.title = Some(title);
    Some(())
}

fn extract_geo(card: ElementRef, event: &mut Event) -> Option<()> {
    event.latitude = Some(meta_attr(card, "latitude", "content")?);
    event.longitude = Some(meta_attr(card, "longitude", "content")?);
    Some(())
}

fn extract_time(card: ElementRef, event: &mut Event) -> Option<()> {
    let raw = first_text_trimmed(card, &SEL_EVENT_TIME)?;
    let start = RE_START_TIME.find(&raw).map_or("", |m| m.as_str());
    event.starttime = Some(start.to_string());
    event.start_date = Some(meta_attr(card, "startDate", "datetime")?);
    Some(())
}
