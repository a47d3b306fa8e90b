use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use remates::export::read_records;
use remates::parser::parse_auction_page;
use remates::scraper::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use remates::types::AuctionRecord;
use remates::utils::{AuctionFilter, AuctionStats, DEFAULT_WINDOW_DAYS};
use remates::{RunOutcome, Settings};

#[derive(Parser)]
#[command(name = "remates")]
#[command(about = "Judicial property auction scraper for preremates.cl", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
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

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
struct WindowArgs {
    #[arg(
        long,
        env = "REMATES_WINDOW_DAYS",
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of days ahead to keep auctions for"
    )]
    window_days: u32,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Reference date for the window (defaults to today)",
        value_parser = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string()),
    )]
    today: Option<NaiveDate>,
}

impl WindowArgs {
    fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the listing, keep upcoming house and apartment auctions, and save them to xlsx
    Run {
        #[arg(long, env = "REMATES_URL", default_value = DEFAULT_URL, help = "Listing page URL")]
        url: String,

        #[arg(
            long,
            env = "REMATES_TIMEOUT_SECS",
            default_value_t = DEFAULT_TIMEOUT_SECS,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Request timeout in seconds"
        )]
        timeout: u64,

        #[arg(
            short = 'd',
            long,
            env = "REMATES_OUTPUT_DIR",
            help = "Directory for the workbook (created if missing)"
        )]
        output_dir: Option<PathBuf>,

        #[arg(
            short = 'f',
            long,
            env = "REMATES_FILE_NAME",
            help = "Workbook file name (defaults to remates_inmuebles_<YYYYMMDD>.xlsx)"
        )]
        file_name: Option<String>,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// Extract auctions from a saved listing page without fetching or writing anything
    Parse {
        #[arg(help = "Path to a saved HTML listing page")]
        file: PathBuf,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// Print the auctions stored in a previously exported workbook
    Inspect {
        #[arg(help = "Path to an exported xlsx workbook")]
        file: PathBuf,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_records(records: &[AuctionRecord], format: &OutputFormat) {
    match format {
        OutputFormat::Json => serialize_json(&records),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No entries to display.");
            } else {
                for (i, record) in records.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, record);
                }
                print!("{}", AuctionStats::from_records(records));
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Run {
            url,
            timeout,
            output_dir,
            file_name,
            window,
        } => {
            let settings = Settings {
                url,
                timeout: Duration::from_secs(timeout),
                window_days: window.window_days,
                ..Settings::default()
            }
            .with_output(output_dir, file_name)
            .validate()
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let today = window.reference_date();
            log::info!(
                "Looking for house and apartment auctions between {} and the next {} days",
                today,
                settings.window_days
            );

            let outcome = remates::run(&settings, today).await.unwrap_or_else(|e| {
                log::error!("{}", e);
                process::exit(1);
            });

            match outcome {
                RunOutcome::Exported { path, records } => {
                    println!("Workbook saved to: {}", path.display());
                    print!("{}", AuctionStats::from_records(&records));
                }
                RunOutcome::NoMatches => {
                    println!("No property auctions found in the requested date range.");
                }
            }
        }

        Commands::Parse {
            file,
            format,
            window,
        } => {
            let filter = AuctionFilter::new(window.reference_date())
                .with_window(window.window_days)
                .validate()
                .unwrap_or_else(|e| {
                    log::error!("Invalid args: {e}");
                    process::exit(1);
                });

            let html = fs::read_to_string(&file).unwrap_or_else(|e| {
                log::error!("Error reading {}: {}", file.display(), e);
                process::exit(1);
            });

            let records = parse_auction_page(&html, &filter);
            print_records(&records, &format);
        }

        Commands::Inspect { file, format } => {
            let records = read_records(&file).unwrap_or_else(|e| {
                log::error!("Error reading {}: {}", file.display(), e);
                process::exit(1);
            });

            print_records(&records, &format);
        }
    }
}
