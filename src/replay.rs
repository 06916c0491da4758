use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use levelbook::{BookConfig, Orderbook, RemoveOutcome, Side};
use tracing::{debug, info, warn};

use crate::cli::Args;
use crate::error::ReplayError;
use crate::output;
use crate::types::Event;

/// Counters reported once the log is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub lines: u64,
    pub added: u64,
    pub removed: u64,
    pub fronts: u64,
    pub rejected: u64,
    pub skipped: u64,
}

/// Build the book config from `--config` and then apply flag overrides.
pub fn load_config(args: &Args) -> Result<BookConfig, ReplayError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text).map_err(|source| ReplayError::Config {
                path: path.display().to_string(),
                source,
            })?
        }
        None => BookConfig::default(),
    };

    if let Some(tick) = args.precision {
        config = config.with_precision(tick);
    }
    if let Some(duplicates) = args.duplicates {
        config = config.with_duplicates(duplicates.into());
    }

    config.validate()?;
    Ok(config)
}

/// Replay `input` (stdin when `None`) and write one line per front query to stdout.
pub fn run(
    input: Option<&Path>,
    config: &BookConfig,
    json_mode: bool,
) -> Result<Stats, ReplayError> {
    let mut book = Orderbook::with_config(config)?;

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);

    let stats = match input {
        Some(path) => {
            info!(path = %path.display(), "reading events");
            let reader = BufReader::new(File::open(path)?);
            replay(reader, &mut book, json_mode, &mut writer)?
        }
        None => {
            info!("reading events from stdin");
            replay(io::stdin().lock(), &mut book, json_mode, &mut writer)?
        }
    };

    info!(
        lines = stats.lines,
        added = stats.added,
        removed = stats.removed,
        fronts = stats.fronts,
        rejected = stats.rejected,
        skipped = stats.skipped,
        orders = book.order_count(),
        buy_levels = book.level_count(Side::Buy),
        sell_levels = book.level_count(Side::Sell),
        "replay finished"
    );
    Ok(stats)
}

/// Apply every event in `reader` to `book`.
///
/// Blank lines and lines starting with `#` are ignored. Lines that fail to
/// parse, and orders the book refuses, are logged and counted but do not stop
/// the replay.
pub fn replay<R, W>(
    reader: R,
    book: &mut Orderbook,
    json_mode: bool,
    writer: &mut W,
) -> Result<Stats, ReplayError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = Stats::default();
    let mut buf = String::with_capacity(256);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        stats.lines += 1;

        let event: Event = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed event");
                stats.skipped += 1;
                continue;
            }
        };

        match event {
            Event::Add(order) => match book.add(order) {
                Ok(()) => stats.added += 1,
                Err(e) => {
                    warn!(line = line_no, error = %e, "order rejected");
                    stats.rejected += 1;
                }
            },
            Event::Remove { id } => match book.remove(&id) {
                RemoveOutcome::NotFound => {
                    debug!(line = line_no, id = %id, "remove for unknown order");
                }
                _ => stats.removed += 1,
            },
            Event::Front { amount } => {
                let front = book.front(amount);
                output::format_front(&mut buf, stats.fronts, amount, &front, json_mode);
                writer.write_all(buf.as_bytes())?;
                stats.fronts += 1;
            }
        }
    }

    writer.flush()?;
    Ok(stats)
}
