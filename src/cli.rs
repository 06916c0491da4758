use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use levelbook::DuplicatePolicy;

/// book-replay: replay a JSON-lines order log through a price-level book.
#[derive(Parser, Debug)]
#[command(name = "book-replay", version)]
pub struct Args {
    /// Order events, one JSON object per line (stdin if omitted)
    pub input: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Output as JSON instead of TSV
    #[arg(long)]
    pub json: bool,

    /// Book config file (JSON); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tick size for level prices (<= 0 keeps raw prices)
    #[arg(long, allow_negative_numbers = true)]
    pub precision: Option<f64>,

    /// What to do with an order id that is already resting
    #[arg(long, value_enum)]
    pub duplicates: Option<Duplicates>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duplicates {
    /// Refuse the new order
    Reject,
    /// Replace the resting order
    Replace,
}

impl From<Duplicates> for DuplicatePolicy {
    fn from(d: Duplicates) -> Self {
        match d {
            Duplicates::Reject => DuplicatePolicy::Reject,
            Duplicates::Replace => DuplicatePolicy::Replace,
        }
    }
}
