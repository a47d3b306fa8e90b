pub mod config;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod scraper;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use pipeline::{PipelineError, RunOutcome, run};
pub use scraper::{ScraperError, WebScraper};
