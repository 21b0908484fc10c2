use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::types::Event;

pub const OUTPUT_FILE_NAME: &str = "dothebay.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Output location for `outdir`. The file name is appended as-is, so a
/// directory prefix needs its own trailing separator.
pub fn output_path(outdir: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", outdir, OUTPUT_FILE_NAME))
}

/// Orders by category, then by upvote text. Upvotes compare as strings, so
/// `"10"` sorts before `"2"`; missing upvotes go last within a category.
fn compare_rows(a: &Event, b: &Event) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| match (&a.upvote, &b.upvote) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

pub fn sorted_rows(events: &[Event]) -> Vec<&Event> {
    let mut rows: Vec<&Event> = events.iter().collect();
    rows.sort_by(|a, b| compare_rows(a, b));
    rows
}

/// Writes the header row and one row per event, sorted, to `writer`.
pub fn write_events<W: Write>(writer: W, events: &[Event]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(Event::COLUMNS)?;
    for event in sorted_rows(events) {
        csv_writer.serialize(event)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `<outdir>dothebay.csv`, replacing any previous file, and returns its path.
pub fn export(events: &[Event], outdir: &str) -> Result<PathBuf, ExportError> {
    let path = output_path(outdir);
    let file = File::create(&path)?;
    write_events(file, events)?;
    log::info!("Wrote {} events to {}", events.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn event(category: &str, upvote: Option<&str>, title: &str) -> Event {
        Event {
            title: Some(title.to_string()),
            upvote: upvote.map(str::to_string),
            ..Event::empty(category)
        }
    }

    fn outdir(dir: &tempfile::TempDir) -> String {
        format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR)
    }

    #[test]
    fn test_output_path_concatenates_without_separator() {
        assert_eq!(output_path(""), PathBuf::from("dothebay.csv"));
        assert_eq!(output_path("out/"), PathBuf::from("out/dothebay.csv"));
        assert_eq!(output_path("out"), PathBuf::from("outdothebay.csv"));
    }

    #[test]
    fn test_upvotes_sort_as_text() {
        let events = vec![
            event("Music", Some("10"), "ten"),
            event("Music", Some("2"), "two"),
        ];

        let rows = sorted_rows(&events);

        assert_eq!(rows[0].upvote.as_deref(), Some("10"));
        assert_eq!(rows[1].upvote.as_deref(), Some("2"));
    }

    #[test]
    fn test_sort_groups_by_category_first() {
        let events = vec![
            event("music", Some("1"), "a"),
            event("comedy", Some("9"), "b"),
            event("music", None, "c"),
            event("comedy", Some("10"), "d"),
            event("music", Some("1"), "e"),
        ];

        let titles: Vec<_> = sorted_rows(&events)
            .into_iter()
            .map(|e| e.title.as_deref().unwrap_or_default())
            .collect();

        assert_eq!(titles, vec!["d", "b", "a", "e", "c"]);
    }

    #[test]
    fn test_write_events_layout() {
        let mut golden = event("music", Some("27"), "Neon Harbor");
        golden.fulltitle = Some("The Fillmore Presents Neon Harbor".to_string());
        golden.venue = Some("The Fillmore, SF".to_string());
        let events = vec![event("music", Some("3"), "Brunch"), golden];

        let mut buf = Vec::new();
        write_events(&mut buf, &events).expect("Failed to write events");
        let text = String::from_utf8(buf).expect("CSV should be UTF-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "fulltitle,title,streetAddress,addressLocality,addressRegion,postalCode,venue,\
             latitude,longitude,starttime,startDate,influencer_count,upvote,tickets,category"
        );
        assert_eq!(
            lines[1],
            "The Fillmore Presents Neon Harbor,Neon Harbor,,,,,\"The Fillmore, SF\",,,,,,27,,music"
        );
        assert_eq!(lines[2], ",Brunch,,,,,,,,,,,3,,music");
        assert_eq!(lines.len(), 3);
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_export_empty_writes_header_only() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let path = export(&[], &outdir(&dir)).expect("Failed to export");

        let text = fs::read_to_string(&path).expect("Failed to read export");
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("fulltitle,title,"));
    }

    #[test]
    fn test_export_twice_is_byte_identical() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let events = vec![
            event("music", Some("10"), "Neon Harbor"),
            event("music", Some("2"), "Sunday Jazz Brunch"),
            event("comedy", None, "Open Mic"),
        ];

        let path = export(&events, &outdir(&dir)).expect("Failed to export");
        let first = fs::read(&path).expect("Failed to read export");

        let again = export(&events, &outdir(&dir)).expect("Failed to export again");
        let second = fs::read(&again).expect("Failed to read export");

        assert_eq!(path, again);
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("dothebay.csv"));
        assert_eq!(first, second);
    }
}
