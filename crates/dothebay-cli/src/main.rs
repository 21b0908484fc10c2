use std::io::{self, Write};
use std::process;

use clap::{Parser, ValueEnum};
use dothebay::export::output_path;
use dothebay::{BayScraper, Progress};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "dothebay")]
#[command(about = "Export today's dothebay.com events to CSV", long_about = None)]
struct Cli {
    #[arg(
        short = 'o',
        long = "outdir",
        default_value = "",
        help = "Output directory for dothebay.csv, including its trailing separator"
    )]
    outdir: String,

    #[arg(
        short = 'p',
        long = "page-limit",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of listing pages to fetch per category"
    )]
    page_limit: u32,

    #[arg(
        short = 'c',
        long = "category",
        value_name = "NAME",
        help = "Only fetch this category (repeatable), e.g. \"Music\""
    )]
    categories: Vec<String>,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "warn",
        help = "Set the logging level"
    )]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

const OK: &str = "\x1b[92mok\x1b[0m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// Status lines on stdout, rewritten in place with `\r` while a step runs.
struct ConsoleProgress;

impl ConsoleProgress {
    fn emit(&self, line: &str) {
        print!("{line}");
        if let Err(e) = io::stdout().flush() {
            log::debug!("Failed to flush progress line: {}", e);
        }
    }

    /// `message` framed by rules as wide as `plain`, its text without escapes.
    fn banner(&self, message: &str, plain: &str) {
        let rule = "-".repeat(plain.chars().count());
        println!("\n{rule}\n{message}\n{rule}\n");
    }
}

impl Progress for ConsoleProgress {
    fn section(&mut self, title: &str) {
        self.emit(&format!("[  ] {title}"));
    }

    fn categories_found(&mut self, count: usize) {
        self.emit(&format!(
            "\r[{OK}] Downloading Available Categories ({count})\n"
        ));
    }

    fn category_started(&mut self, name: &str) {
        self.emit(&format!("[  ] Collecting Events For {name}"));
    }

    fn page_started(&mut self, name: &str, page: u32, max_pages: u32) {
        self.emit(&format!(
            "\r[  ] Collecting Events For {name} ... {BLUE}{page} of {max_pages}{RESET}"
        ));
    }

    fn category_finished(&mut self, name: &str, events_added: usize) {
        self.emit(&format!(
            "\r[{OK}] Collecting Events For {name} ({events_added} events)\x1b[K\n"
        ));
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let mut progress = ConsoleProgress;
    progress.banner(
        "DoTheBay \x1b[41;1mSan Francisco\x1b[0m",
        "DoTheBay San Francisco",
    );

    let scraper = BayScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let filter = (!cli.categories.is_empty()).then_some(cli.categories.as_slice());

    let events = scraper
        .load_all(cli.page_limit, filter, &mut progress)
        .unwrap_or_else(|e| {
            log::error!("Error collecting events: {}", e);
            process::exit(1);
        });

    let path = dothebay::export(&events, &cli.outdir).unwrap_or_else(|e| {
        log::error!(
            "Error writing {}: {}",
            output_path(&cli.outdir).display(),
            e
        );
        process::exit(1);
    });

    let saved = format!("{} events saved to {}", events.len(), path.display());
    progress.banner(&saved, &saved);
}
