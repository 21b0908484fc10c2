/// Status reporting for a scrape run. Frontends implement this to show progress;
/// every method defaults to doing nothing.
pub trait Progress {
    /// A titled stage of the run, such as category discovery.
    fn section(&mut self, _title: &str) {}

    /// Category discovery finished with `count` categories.
    fn categories_found(&mut self, _count: usize) {}

    fn category_started(&mut self, _name: &str) {}

    /// About to fetch `page` of at most `max_pages` for `name`.
    fn page_started(&mut self, _name: &str, _page: u32, _max_pages: u32) {}

    fn category_finished(&mut self, _name: &str, _events_added: usize) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
