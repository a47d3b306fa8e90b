use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::export::{ExportError, ExportOptions, write_records};
use crate::parser::parse_auction_page;
use crate::scraper::{ScraperError, WebScraper};
use crate::types::AuctionRecord;
use crate::utils::AuctionFilter;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Could not fetch the listing page: {0}")]
    Fetch(#[from] ScraperError),
    #[error("Could not export auctions: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug)]
pub enum RunOutcome {
    Exported {
        path: PathBuf,
        records: Vec<AuctionRecord>,
    },
    NoMatches,
}

/// Fetch, extract, filter and export. `today` is the reference date for the
/// whole run and also names the default output file.
pub async fn run(settings: &Settings, today: NaiveDate) -> Result<RunOutcome, PipelineError> {
    let filter = AuctionFilter::new(today)
        .with_window(settings.window_days)
        .validate()
        .map_err(PipelineError::InvalidSettings)?;

    let scraper = WebScraper::with_url(&settings.url, settings.timeout)?;
    let html = scraper.fetch_listing().await?;

    let records = parse_auction_page(&html, &filter);
    export(records, &settings.export, today)
}

pub fn export(
    records: Vec<AuctionRecord>,
    options: &ExportOptions,
    today: NaiveDate,
) -> Result<RunOutcome, PipelineError> {
    match write_records(&records, options, today)? {
        Some(path) => Ok(RunOutcome::Exported { path, records }),
        None => {
            log::info!("No property auctions found in the requested date range");
            Ok(RunOutcome::NoMatches)
        }
    }
}
